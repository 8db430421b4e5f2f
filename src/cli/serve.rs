use crate::{config::Settings, error, server, warning};

pub async fn serve(settings: Settings, open: bool) {
    let login_url = format!(
        "http://{}/login",
        settings.server_addr.replace("0.0.0.0", "localhost")
    );

    let server = tokio::spawn(server::start_api_server(settings));

    if open && webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Server stopped. Err: {}", e),
        Err(e) => error!("Server task failed. Err: {}", e),
    }
}
