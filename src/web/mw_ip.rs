// src/web/mw_ip.rs
use crate::{error::AppError, state::AppState};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, SocketAddr};

/// Só deixa passar pedidos vindos de um IP da lista configurada.
/// Sem IP conhecido, o pedido é recusado.
pub async fn require_ip_permitido(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = ip_de_origem(&request, state.config.confiar_proxy);

    match ip {
        Some(ip) if state.config.ips_permitidos.contains(&ip) => {
            tracing::debug!("IP MW: {} autorizado para {}", ip, request.uri().path());
            Ok(next.run(request).await)
        }
        Some(ip) => {
            tracing::warn!("IP MW: acesso negado para {} em {}", ip, request.uri().path());
            Err(AppError::acesso_negado())
        }
        None => {
            tracing::warn!("IP MW: IP de origem desconhecido em {}. Acesso negado.", request.uri().path());
            Err(AppError::acesso_negado())
        }
    }
}

fn ip_de_origem(request: &Request, confiar_proxy: bool) -> Option<IpAddr> {
    let ip = match request.headers().get("x-forwarded-for") {
        Some(valor) if confiar_proxy => ip_encaminhado(valor)?,
        _ => request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())?,
    };
    // Com BIND_ADDR [::], clientes IPv4 chegam como ::ffff:a.b.c.d
    Some(ip.to_canonical())
}

// Última entrada de X-Forwarded-For: a que o proxy acrescentou.
// As anteriores vêm do cliente e podem ser forjadas.
fn ip_encaminhado(valor: &HeaderValue) -> Option<IpAddr> {
    valor.to_str().ok()?.rsplit(',').next()?.trim().parse().ok()
}
