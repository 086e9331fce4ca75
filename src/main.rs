// src/main.rs

// --- Declaração dos Módulos ---
mod config;
mod db;
mod error;
mod models;
mod repositories;
mod services;
mod state;
mod templates;
mod web;

// --- Imports ---
use crate::{
    config::AppConfig,
    repositories::user_repository::SqliteUserRepository,
    services::{evento_service, notificacao_service},
    state::AppState,
};
use axum::serve;
use std::{env, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tarefa diária, disparada pelo agendador do sistema (cron/systemd), não por este processo.
const CMD_INATIVAR_EXPIRADOS: &str = "eventos:inativar-expirados";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuração do Logging (Tracing) ---
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                env::var("RUST_LOG")
                    .unwrap_or_else(|_| "eventos=debug,tower_http=info,sqlx=warn".into())
                    .into()
            }),
        )
        .with(fmt::layer())
        .init();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Configuração inválida: {}", e))?;

    // --- Configuração da Base de Dados ---
    let db_pool = match db::create_db_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Falha crítica ao inicializar a base de dados: {}", e);
            return Err(anyhow::anyhow!("Falha ao conectar/migrar DB: {}", e));
        }
    };

    // --- Comandos agendados (execução única) ---
    match env::args().nth(1).as_deref() {
        Some(CMD_INATIVAR_EXPIRADOS) => {
            let agora = chrono::Local::now().naive_local();
            let total = evento_service::inativar_expirados(&db_pool, agora).await?;
            tracing::info!("✅ {}: {} eventos desativados.", CMD_INATIVAR_EXPIRADOS, total);
            return Ok(());
        }
        Some(outro) => {
            return Err(anyhow::anyhow!(
                "Comando desconhecido '{}'. Disponível: {}",
                outro,
                CMD_INATIVAR_EXPIRADOS
            ));
        }
        None => {}
    }

    tracing::info!("🚀 Iniciando servidor de eventos...");

    let mailer = notificacao_service::criar_transport(&config)?;
    tracing::info!("🔒 {} IPs autorizados nas rotas protegidas.", config.ips_permitidos.len());

    // --- Criação do Estado da Aplicação ---
    let bind_addr = config.bind_addr;
    let app_state = AppState {
        users: Arc::new(SqliteUserRepository::new(db_pool.clone())),
        db_pool,
        config: Arc::new(config),
        mailer,
    };

    // --- Configuração do Endereço e Listener ---
    tracing::info!("📡 Servidor escutando em http://{}", bind_addr);
    let listener = match TcpListener::bind(bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Falha ao iniciar listener em {}: {}", bind_addr, e);
            return Err(e.into());
        }
    };

    // --- Criação do Router e Aplicação das Camadas (Middlewares) ---
    let app = web::routes::create_router(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    // --- Início do Servidor ---
    // ConnectInfo dá ao filtro de IP o endereço de origem de cada ligação
    tracing::info!("👂 Servidor pronto para aceitar conexões...");
    if let Err(e) = serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await {
        tracing::error!("❌ Erro fatal no servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}
