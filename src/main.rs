fn main() -> anyhow::Result<()> {
    lumicube::app::run()
}
