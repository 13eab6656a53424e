fn main() -> std::io::Result<()> {
    propbridge_lib::run()
}
