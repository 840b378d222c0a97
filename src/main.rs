use anyhow::Result;

fn main() -> Result<()> {
    code_mentor::cli::run()
}
