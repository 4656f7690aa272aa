mod config;

use api::Lobby;
use db::{Database, JsonFile, Ledger, NoTls};
use hyper::{body::Incoming, server::conn::http1, service::service_fn, Request};
use hyper_util::rt::TokioIo;
use std::{convert::Infallible, net::Ipv4Addr};
use tokio::{net::TcpListener, runtime::Runtime};

async fn connect(pg: &config::Postgres) -> anyhow::Result<Ledger> {
    let (client, conn) = db::Config::new()
        .host(&pg.host)
        .user(&pg.user)
        .password(&pg.password)
        .dbname(&pg.dbname)
        .port(5432)
        .connect(NoTls)
        .await?;
    tokio::spawn(async move {
        if let Err(err) = conn.await {
            log::error!("database connection closed: {err}");
        }
    });

    let db = Database::from(client);
    db.migrate().await?;
    log::info!("recording results to PostgreSQL at {}", pg.host);
    Ok(Ledger::from(db))
}

async fn serve(config: config::Config) -> anyhow::Result<()> {
    let ledger = match &config.postgres {
        Some(pg) => connect(pg).await?,
        None => {
            log::warn!("PG_HOSTNAME is not set; results are kept in memory");
            Ledger::default()
        }
    };

    let questions = JsonFile::new(config.questions);
    let lobby = Lobby::new(ledger, Box::new(questions), config.settings);

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port)).await?;
    log::info!("listening on port {}", config.port);

    let mut stop = core::pin::pin!(tokio::signal::ctrl_c());
    loop {
        let (stream, addr) = tokio::select! {
            biased;
            res = &mut stop => {
                res?;
                break;
            }
            conn = listener.accept() => conn?,
        };

        log::debug!("accepted connection from {addr}");
        let lobby = lobby.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let lobby = lobby.clone();
                async move { Ok::<_, Infallible>(api::respond(req, &lobby).await) }
            });
            if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                log::error!("connection from {addr} failed: {err}");
            }
        });
    }

    log::info!("shutting down");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = config::Config::from_env()?;
    Runtime::new()?.block_on(serve(config))
}
