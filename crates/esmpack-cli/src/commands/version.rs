use esmpack_core::version::version_string;
use miette::Result;
use std::path::Path;

pub fn run(repo: &Path) -> Result<()> {
    println!("{}", version_string(Some(repo)));
    Ok(())
}
