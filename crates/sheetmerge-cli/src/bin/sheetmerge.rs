fn main() -> anyhow::Result<()> {
    sheetmerge_cli::run()
}
