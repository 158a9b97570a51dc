fn main() -> anyhow::Result<()> {
    shortcut_filter::run()
}
