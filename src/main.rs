// src/main.rs

// --- Declaração dos Módulos ---
mod config;
mod db;
mod error;
mod models;
mod services;
mod state;
mod store;
mod templates;
mod web;

// --- Imports ---
use crate::config::AppConfig;
use crate::state::AppState;
use crate::store::{
    retry::ComRetry, sqlite::SqliteSheetStore, ABA_CONFIG, ABA_PRESENCA, ABA_USUARIOS,
    CABECALHO_CONFIG, CABECALHO_PRESENCA, CABECALHO_USUARIOS,
};
use axum::serve;
use std::net::SocketAddr;
use time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::Key, Expiry, ExpiredDeletion, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuração do Logging (Tracing) ---
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "rota_presenca=debug,tower_http=info,sqlx=warn,tower_sessions=info".into()
        }))
        .with(fmt::layer())
        .init();

    tracing::info!("🚌 Iniciando servidor Rota Presença...");

    // --- Configuração tipada, resolvida uma vez ---
    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Falha ao carregar configuração: {}", e))?;

    // --- Base de Dados ---
    let db_pool = match db::create_db_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Falha crítica ao inicializar a base de dados: {}", e);
            return Err(anyhow::anyhow!("Falha ao conectar/migrar DB: {}", e));
        }
    };

    // --- Planilha (abas fixas com cabeçalho garantido no arranque) ---
    let sheet_store = SqliteSheetStore::new(db_pool.clone());
    sheet_store
        .garantir_cabecalho(ABA_PRESENCA, &CABECALHO_PRESENCA)
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao preparar aba de presença: {}", e))?;
    sheet_store
        .garantir_cabecalho(ABA_USUARIOS, &CABECALHO_USUARIOS)
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao preparar aba de usuários: {}", e))?;
    sheet_store
        .garantir_cabecalho(ABA_CONFIG, &CABECALHO_CONFIG)
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao preparar aba de config: {}", e))?;
    // Todo o acesso à planilha passa pelo decorador de retry.
    let store = ComRetry::new(sheet_store);
    tracing::info!("📋 Planilha pronta (abas presenca/usuarios/config).");

    // --- Configuração das Sessões ---
    let session_store = SqliteStore::new(db_pool.clone())
        .with_table_name("sessions")
        .map_err(|e| anyhow::anyhow!("Falha ao criar session store: {}", e))?;
    session_store
        .migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao migrar session store: {}", e))?;

    // Task de limpeza de sessões expiradas
    let session_store_clone = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = session_store_clone
            .continuously_delete_expired(tokio::time::Duration::from_secs(60 * 60))
            .await
        {
            tracing::error!("Erro na task de limpeza de sessões: {:?}", e);
        }
    });
    tracing::info!("🧹 Tarefa de limpeza de sessões iniciada.");

    // O cookie de sessão é assinado com a SESSION_SECRET (mín. 64 bytes).
    let key = Key::try_from(config.session_secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("SESSION_SECRET inválida (mínimo 64 bytes): {}", e))?;
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_signed(key)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));
    tracing::info!("🔑 Camada de sessão configurada (cookie assinado).");

    // --- Estado da Aplicação ---
    let porta = config.porta;
    let app_state = AppState {
        db_pool,
        store,
        config,
    };

    // --- Endereço e Listener ---
    let addr = SocketAddr::from(([0, 0, 0, 0], porta));
    tracing::info!("📡 Servidor escutando em http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Falha ao iniciar listener na porta {}: {}", porta, e);
            return Err(e.into());
        }
    };

    // --- Router e Camadas (Middlewares) ---
    tracing::info!("🛠️ Construindo router e aplicando middlewares...");
    let app = web::routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CookieManagerLayer::new())
            .layer(session_layer),
    );
    tracing::info!("✅ Router e middlewares configurados.");

    // --- Início do Servidor ---
    tracing::info!("👂 Servidor pronto para aceitar conexões...");
    if let Err(e) = serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Erro fatal no servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}
