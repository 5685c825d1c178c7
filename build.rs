use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    // Surfaced through `tas_parser --version`
    EmitBuilder::builder()
        .build_date()
        .git_sha(true)
        .emit()?;
    Ok(())
}
