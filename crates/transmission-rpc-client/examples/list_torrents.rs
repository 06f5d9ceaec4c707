use transmission_rpc_client::types::TorrentGet;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut client =
        transmission_rpc_client::client::Client::new("http://localhost:9091/transmission/rpc")?;

    for torrent in client.torrent_get(TorrentGet::default()).await?.torrents {
        println!(
            "{}: {} ({:?})",
            torrent.name.as_deref().unwrap_or_default(),
            torrent
                .status
                .map(|status| status.to_string())
                .unwrap_or_default(),
            torrent.percent_done
        );
    }

    Ok(())
}
