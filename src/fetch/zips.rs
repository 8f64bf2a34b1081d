use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use reqwest::{
    blocking::Client,
    header::{HeaderValue, USER_AGENT},
    StatusCode,
};
use std::{fs, path::Path, time::Instant};
use tracing::info;

/// Blocking client carrying the configured timeout.
pub fn build_client(config: &PipelineConfig) -> Result<Client> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(client)
}

/// GET `url` and write the body verbatim to `dest`.
///
/// Only a 200 counts as success; on any other status nothing is written.
#[tracing::instrument(
    level = "info",
    skip(client, user_agent, dest),
    fields(dest = %dest.as_ref().display())
)]
pub fn download_zip(
    client: &Client,
    url: &str,
    user_agent: &str,
    dest: impl AsRef<Path>,
) -> Result<u64> {
    let dest = dest.as_ref();
    let start = Instant::now();

    let agent = HeaderValue::from_str(user_agent)?;
    let resp = client.get(url).header(USER_AGENT, agent).send()?;

    let status = resp.status();
    if status != StatusCode::OK {
        return Err(PipelineError::Download {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = resp.bytes()?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    fs::write(dest, &bytes).map_err(|e| PipelineError::io(dest, e))?;

    info!(bytes = bytes.len(), elapsed = ?start.elapsed(), "archive downloaded");
    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::tempdir;

    /// Serve one request with `status` and `body`, returning the URL and a
    /// handle yielding the request head the client sent.
    fn serve_once(
        status: &'static str,
        body: &'static [u8],
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/download", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = String::new();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(body).unwrap();
            head
        });
        (url, handle)
    }

    #[test]
    fn writes_body_and_sends_user_agent() -> anyhow::Result<()> {
        let (url, server) = serve_once("200 OK", b"PK-not-really-a-zip");
        let dir = tempdir()?;
        let dest = dir.path().join("raw").join("a.zip");
        let cfg = PipelineConfig::default();

        let n = download_zip(&build_client(&cfg)?, &url, "Mozilla/5.0", &dest)?;
        assert_eq!(n, 19);
        assert_eq!(fs::read(&dest)?, b"PK-not-really-a-zip");

        let head = server.join().unwrap().to_lowercase();
        assert!(head.contains("user-agent: mozilla/5.0"), "{head}");
        Ok(())
    }

    #[test]
    fn non_200_is_download_error_and_writes_nothing() -> anyhow::Result<()> {
        let (url, server) = serve_once("404 Not Found", b"gone");
        let dir = tempdir()?;
        let dest = dir.path().join("a.zip");
        let cfg = PipelineConfig::default();

        let err = download_zip(&build_client(&cfg)?, &url, "Mozilla/5.0", &dest).unwrap_err();
        assert!(
            matches!(err, PipelineError::Download { status: 404, .. }),
            "{err}"
        );
        assert!(!dest.exists());
        server.join().unwrap();
        Ok(())
    }

    #[test]
    fn other_success_codes_are_still_failures() -> anyhow::Result<()> {
        let (url, server) = serve_once("204 No Content", b"");
        let dir = tempdir()?;
        let dest = dir.path().join("a.zip");
        let cfg = PipelineConfig::default();

        let err = download_zip(&build_client(&cfg)?, &url, "Mozilla/5.0", &dest).unwrap_err();
        assert!(matches!(err, PipelineError::Download { status: 204, .. }));
        server.join().unwrap();
        Ok(())
    }
}
