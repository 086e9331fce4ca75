// src/web/tests.rs
// Testes do router completo: inscrição, certificado e rotas protegidas.
use crate::{
    db::test_pool,
    models::evento::evento_de_teste,
    services::{evento_service, notificacao_service::tests::MemoryMailer},
    state::test_support::{test_config, test_state},
    web::routes::create_router,
};
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Local};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use std::{net::SocketAddr, sync::Arc, time::Duration as StdDuration};
use tempfile::TempDir;
use tower::ServiceExt;

const IP_OPERADOR: &str = "200.135.1.10";

struct Ambiente {
    app: Router,
    pool: SqlitePool,
    mailer: Arc<MemoryMailer>,
    _storage: TempDir,
}

async fn ambiente() -> Ambiente {
    let pool = test_pool().await;
    let storage = tempfile::tempdir().unwrap();
    let mailer = Arc::new(MemoryMailer::default());
    let config = test_config(&[IP_OPERADOR, "127.0.0.1"], storage.path().to_path_buf());
    let app = create_router(test_state(pool.clone(), config, mailer.clone()));
    Ambiente { app, pool, mailer, _storage: storage }
}

/// Evento a decorrer agora, com modelo de certificado.
async fn evento_aberto(pool: &SqlitePool) -> i64 {
    let mut evento = evento_de_teste();
    let agora = Local::now().naive_local();
    evento.inicio = agora - Duration::hours(1);
    evento.fim = agora + Duration::days(2);
    evento.certificado_conteudo = Some("<p>Certificamos que <b>{{nome}}</b> (CPF {{cpf}}) participou de {{evento}}.</p>".into());
    evento_service::inserir_evento_de_teste(pool, &evento).await
}

fn get(uri: &str, ip: Option<&str>) -> Request<Body> {
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    if let Some(ip) = ip {
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::new(ip.parse().unwrap(), 51000)));
    }
    request
}

fn post_form(uri: &str, corpo: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(corpo.to_string()))
        .unwrap()
}

async fn texto(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn esperar_emails(mailer: &MemoryMailer, quantidade: usize) -> usize {
    for _ in 0..100 {
        let n = mailer.enviadas.lock().await.len();
        if n >= quantidade {
            return n;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    mailer.enviadas.lock().await.len()
}

const FORM_ANA: &str = "nome=Ana+Souza&cpf=123.456.789-01&telefone=%2848%29+99887-7665&email=ana%40mail.com&horario=08%3A30";

#[tokio::test]
async fn inscricao_cria_participante_e_envia_confirmacao() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;

    let response = amb
        .app
        .clone()
        .oneshot(post_form(&format!("/eventos/{}/inscricao", evento_id), FORM_ANA))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).contains("success="));

    assert_eq!(esperar_emails(&amb.mailer, 1).await, 1);
    let enviadas = amb.mailer.enviadas.lock().await;
    assert_eq!(enviadas[0].assunto, "Inscrição realizada!");
    assert_eq!(enviadas[0].para_email, "ana@mail.com");
    assert!(enviadas[0].corpo_html.contains("Ana Souza"));
}

#[tokio::test]
async fn inscricao_repetida_nao_envia_segundo_email() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;
    let uri = format!("/eventos/{}/inscricao", evento_id);

    amb.app.clone().oneshot(post_form(&uri, FORM_ANA)).await.unwrap();
    let response = amb.app.clone().oneshot(post_form(&uri, FORM_ANA)).await.unwrap();
    assert!(location(&response).contains("error="));

    assert_eq!(esperar_emails(&amb.mailer, 1).await, 1);
    tokio::time::sleep(StdDuration::from_millis(30)).await;
    assert_eq!(amb.mailer.enviadas.lock().await.len(), 1);
}

#[tokio::test]
async fn cpf_repetido_nao_sobrescreve_dados_do_participante() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;
    let uri = format!("/eventos/{}/inscricao", evento_id);
    amb.app.clone().oneshot(post_form(&uri, FORM_ANA)).await.unwrap();

    let intruso = "nome=Mallory&cpf=123.456.789-01&telefone=11900000000&email=mallory%40evil.com&horario=09%3A00";
    let response = amb.app.clone().oneshot(post_form(&uri, intruso)).await.unwrap();
    assert!(location(&response).contains("error="));

    let (nome, email, telefone): (String, String, String) =
        sqlx::query_as("SELECT nome, email, telefone FROM participantes WHERE cpf = '12345678901'")
            .fetch_one(&amb.pool)
            .await
            .unwrap();
    assert_eq!(nome, "Ana Souza");
    assert_eq!(email, "ana@mail.com");
    assert_eq!(telefone, "48998877665");

    let response = amb
        .app
        .clone()
        .oneshot(get(&format!("/certificados/{}/1", evento_id), Some(IP_OPERADOR)))
        .await
        .unwrap();
    let html = texto(response).await;
    assert!(html.contains("Ana Souza"));
    assert!(!html.contains("Mallory"));
}

#[tokio::test]
async fn horario_invalido_e_recusado() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;
    let corpo = FORM_ANA.replace("horario=08%3A30", "horario=03%3A00");

    let response = amb
        .app
        .clone()
        .oneshot(post_form(&format!("/eventos/{}/inscricao", evento_id), &corpo))
        .await
        .unwrap();
    assert!(location(&response).contains("error="));
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inscricoes").fetch_one(&amb.pool).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn inscricao_invalida_volta_com_erro() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;

    let response = amb
        .app
        .clone()
        .oneshot(post_form(&format!("/eventos/{}/inscricao", evento_id), "nome=Ana&cpf=123&email=ana%40mail.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).contains("error="));
    assert!(amb.mailer.enviadas.lock().await.is_empty());
}

#[tokio::test]
async fn inscricao_em_evento_inativo_e_recusada() {
    let amb = ambiente().await;
    let mut evento = evento_de_teste();
    evento.ativo = false;
    evento.fim = Local::now().naive_local() + Duration::days(1);
    let evento_id = evento_service::inserir_evento_de_teste(&amb.pool, &evento).await;

    let response = amb
        .app
        .clone()
        .oneshot(post_form(&format!("/eventos/{}/inscricao", evento_id), FORM_ANA))
        .await
        .unwrap();
    assert!(location(&response).contains("error="));
}

#[tokio::test]
async fn formulario_lista_horarios_e_evento_inexistente_da_404() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;

    let response = amb.app.clone().oneshot(get(&format!("/eventos/{}/inscricao", evento_id), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = texto(response).await;
    assert!(html.contains("<option value=\"08:00\">"));
    assert!(html.contains("<option value=\"22:00\">"));

    let response = amb.app.clone().oneshot(get("/eventos/999/inscricao", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn certificado_para_ip_permitido() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;
    amb.app
        .clone()
        .oneshot(post_form(&format!("/eventos/{}/inscricao", evento_id), FORM_ANA))
        .await
        .unwrap();

    let response = amb
        .app
        .clone()
        .oneshot(get(&format!("/certificados/{}/1", evento_id), Some(IP_OPERADOR)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = texto(response).await;
    assert!(html.contains("<b>Ana Souza</b> (CPF 123.456.789-01)"));
    let hoje = Local::now().date_naive().format("%d/%m/%Y").to_string();
    assert!(html.contains(&format!("Florianópolis, {}", hoje)));
    // A imagem configurada não existe no storage de teste
    assert!(!html.contains("background-image"));
}

#[tokio::test]
async fn certificado_para_ip_desconhecido_e_403() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;

    let response = amb
        .app
        .clone()
        .oneshot(get(&format!("/certificados/{}/1", evento_id), Some("8.8.8.8")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(texto(response).await.contains("Acesso não autorizado!"));

    let response = amb
        .app
        .clone()
        .oneshot(get(&format!("/certificados/{}/1", evento_id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn certificado_de_participante_nao_inscrito_e_404() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;
    let outro_evento = evento_aberto(&amb.pool).await;
    amb.app
        .clone()
        .oneshot(post_form(&format!("/eventos/{}/inscricao", evento_id), FORM_ANA))
        .await
        .unwrap();

    let response = amb
        .app
        .clone()
        .oneshot(get(&format!("/certificados/{}/1", outro_evento), Some("127.0.0.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn participantes_com_mascaras() {
    let amb = ambiente().await;
    let evento_id = evento_aberto(&amb.pool).await;
    amb.app
        .clone()
        .oneshot(post_form(&format!("/eventos/{}/inscricao", evento_id), FORM_ANA))
        .await
        .unwrap();

    let uri = format!("/admin/eventos/{}/participantes", evento_id);
    let response = amb.app.clone().oneshot(get(&uri, Some(IP_OPERADOR))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = texto(response).await;
    assert!(html.contains("123.456.789-01"));
    assert!(html.contains("(48) 99887-7665"));
    assert!(html.contains("<td>08:30</td>"));

    let response = amb.app.clone().oneshot(get(&uri, Some("10.0.0.9"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn usuarios_em_json() {
    let amb = ambiente().await;
    for (username, ativo) in [("ana.souza", true), ("bruno", false)] {
        sqlx::query("INSERT INTO users (username, name, ativo) VALUES (?1, ?1, ?2)")
            .bind(username)
            .bind(ativo)
            .execute(&amb.pool)
            .await
            .unwrap();
    }

    let response = amb.app.clone().oneshot(get("/admin/usuarios", Some(IP_OPERADOR))).await.unwrap();
    let todos: serde_json::Value = serde_json::from_str(&texto(response).await).unwrap();
    assert_eq!(todos.as_array().unwrap().len(), 2);

    let response = amb.app.clone().oneshot(get("/admin/usuarios?ativo=false", Some(IP_OPERADOR))).await.unwrap();
    let inativos: serde_json::Value = serde_json::from_str(&texto(response).await).unwrap();
    assert_eq!(inativos[0]["username"], "bruno");
    assert_eq!(inativos.as_array().unwrap().len(), 1);

    let response = amb.app.clone().oneshot(get("/admin/usuarios/username/ana.souza", Some(IP_OPERADOR))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = amb.app.clone().oneshot(get("/admin/usuarios/42", Some(IP_OPERADOR))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rotas_publicas_nao_passam_pelo_filtro_de_ip() {
    let amb = ambiente().await;
    let response = amb.app.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = amb.app.clone().oneshot(get("/eventos", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
