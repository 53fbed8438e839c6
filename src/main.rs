fn main() -> Result<(), Box<dyn std::error::Error>> {
    hookchat::cli::main()
}
