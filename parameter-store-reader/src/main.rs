use parameter_store_reader::reader;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = reader::start().await;
    std::process::exit(code);
}
