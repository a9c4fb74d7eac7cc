fn main() -> anyhow::Result<()> {
    whirl::run()
}
