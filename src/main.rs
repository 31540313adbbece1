fn main() -> miette::Result<()> {
    stdinext::cli::run()
}
