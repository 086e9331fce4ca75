// src/web/routes.rs
use crate::{
    state::AppState,
    web::{admin_handlers, certificado_handlers, evento_handlers, mw_ip},
};
use axum::{
    middleware,
    routing::get,
    Router,
};

pub fn create_router(app_state: AppState) -> Router {

    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/", get(|| async { axum::response::Redirect::permanent("/eventos") }))
        .route("/health", get(|| async { "ok" }))
        .route("/eventos", get(evento_handlers::listar_eventos))
        .route(
            "/eventos/{id}/inscricao",
            get(evento_handlers::show_inscricao_form).post(evento_handlers::handle_inscricao),
        );

    // --- Rotas da equipa ---
    let admin_routes = Router::new()
        .route("/eventos/{id}/participantes", get(admin_handlers::listar_participantes))
        .route("/usuarios", get(admin_handlers::listar_usuarios))
        .route("/usuarios/{id}", get(admin_handlers::mostrar_usuario))
        .route("/usuarios/username/{username}", get(admin_handlers::mostrar_usuario_por_username));

    // --- Rotas protegidas por IP ---
    // O middleware corre antes de qualquer handler aninhado aqui
    let ip_routes = Router::new()
        .route(
            "/certificados/{evento_id}/{participante_id}",
            get(certificado_handlers::emitir_certificado),
        )
        .nest("/admin", admin_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_ip::require_ip_permitido,
        ));

    Router::new()
        .merge(public_routes)
        .merge(ip_routes)
        .with_state(app_state)
}
