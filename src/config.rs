// src/config.rs
use crate::error::{AppError, AppResult};
use std::{
    collections::HashSet,
    env,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

/// IPs aceites quando IPS_PERMITIDOS não está definida.
const IPS_PERMITIDOS_PADRAO: &str = "127.0.0.1";
const BIND_ADDR_PADRAO: &str = "0.0.0.0:3000";
const STORAGE_ROOT_PADRAO: &str = "storage/app/public";
const SMTP_PORT_PADRAO: u16 = 587;
const MAIL_FROM_PADRAO: &str = "eventos@localhost";

/// Lista fixa de origens autorizadas para as rotas protegidas.
/// Carregada uma vez no arranque; não é lida da base de dados.
#[derive(Debug, Clone, Default)]
pub struct IpAllowList {
    ips: HashSet<IpAddr>,
}

impl IpAllowList {
    pub fn new(ips: impl IntoIterator<Item = IpAddr>) -> Self {
        Self { ips: ips.into_iter().collect() }
    }

    /// Lê uma lista separada por vírgulas ("1.2.3.4, 127.0.0.1").
    /// Entradas vazias são ignoradas; entradas inválidas são erro de configuração.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let mut ips = Vec::new();
        for entrada in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let ip = entrada.parse::<IpAddr>().map_err(|e| {
                AppError::ConfigError(format!("IP inválido em IPS_PERMITIDOS ('{}'): {}", entrada, e))
            })?;
            ips.push(ip);
        }
        Ok(Self::new(ips))
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.ips.contains(ip)
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }
}

/// Configuração do servidor SMTP. Ausente quando SMTP_HOST não está definida.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub ips_permitidos: IpAllowList,
    /// Se verdadeiro, o último IP de X-Forwarded-For (o que o proxy acrescentou)
    /// substitui o IP da ligação.
    pub confiar_proxy: bool,
    /// Raiz onde ficam as imagens de fundo dos certificados.
    pub storage_root: PathBuf,
    pub smtp: Option<SmtpConfig>,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let database_url = env::var("DATABASE_URL")?;

        let bind_raw = var_ou_padrao("BIND_ADDR", BIND_ADDR_PADRAO);
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| AppError::ConfigError(format!("BIND_ADDR inválido ('{}'): {}", bind_raw, e)))?;

        let ips_permitidos = IpAllowList::parse(&var_ou_padrao("IPS_PERMITIDOS", IPS_PERMITIDOS_PADRAO))?;
        if ips_permitidos.is_empty() {
            tracing::warn!("⚠️ IPS_PERMITIDOS está vazia: todas as rotas protegidas vão responder 403.");
        }

        let confiar_proxy = env::var("CONFIAR_PROXY")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "sim"))
            .unwrap_or(false);

        let smtp = env::var("SMTP_HOST").ok().map(|host| SmtpConfig {
            host,
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(SMTP_PORT_PADRAO),
            user: env::var("SMTP_USER").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
        });

        Ok(Self {
            database_url,
            bind_addr,
            ips_permitidos,
            confiar_proxy,
            storage_root: PathBuf::from(var_ou_padrao("STORAGE_ROOT", STORAGE_ROOT_PADRAO)),
            smtp,
            mail_from: var_ou_padrao("MAIL_FROM", MAIL_FROM_PADRAO),
        })
    }
}

fn var_ou_padrao(key: &str, padrao: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        tracing::debug!("{} não definida, usando padrão: {}", key, padrao);
        padrao.to_string()
    })
}
