mod shell;

fn main() -> anyhow::Result<()> {
    shell::run()
}
