#[tokio::main]
async fn main() {
    if let Err(e) = pipeline_trace_server::run().await {
        eprintln!("pipeline-trace-server: {e}");
        std::process::exit(1);
    }
}
