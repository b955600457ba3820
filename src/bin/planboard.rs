use anyhow::Result;

fn main() -> Result<()> {
    planboard::cli::run()
}
