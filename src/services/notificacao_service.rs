// src/services/notificacao_service.rs
use crate::{
    config::{AppConfig, SmtpConfig},
    error::{AppError, AppResult},
    models::{evento::Evento, participante::Participante},
    templates::InscricaoEmail,
};
use askama::Template;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

pub const ASSUNTO_CONFIRMACAO: &str = "Inscrição realizada!";

/// Email já composto, pronto para o transporte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MensagemEmail {
    pub para_nome: String,
    pub para_email: String,
    pub assunto: String,
    pub corpo_html: String,
}

/// Confirmação de inscrição de um participante num evento.
pub fn compor_confirmacao(participante: &Participante, evento: &Evento) -> AppResult<MensagemEmail> {
    let corpo = InscricaoEmail {
        participante,
        evento,
        data_inicio: evento.inicio.format("%d/%m/%Y %H:%M").to_string(),
        data_fim: evento.fim.format("%d/%m/%Y %H:%M").to_string(),
    };
    Ok(MensagemEmail {
        para_nome: participante.nome.clone(),
        para_email: participante.email.clone(),
        assunto: ASSUNTO_CONFIRMACAO.to_string(),
        corpo_html: corpo.render()?,
    })
}

/// Infraestrutura de envio. Filas e novas tentativas são responsabilidade dela.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn enviar(&self, mensagem: &MensagemEmail) -> AppResult<()>;
}

/// Envio por SMTP (STARTTLS).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    remetente: Mailbox,
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpConfig, remetente: &str) -> AppResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| AppError::ConfigError(format!("SMTP_HOST inválido: {}", e)))?
            .port(smtp.port);
        if let (Some(user), Some(pass)) = (&smtp.user, &smtp.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        let remetente = remetente
            .parse::<Mailbox>()
            .map_err(|e| AppError::ConfigError(format!("MAIL_FROM inválido: {}", e)))?;
        Ok(Self { transport: builder.build(), remetente })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn enviar(&self, mensagem: &MensagemEmail) -> AppResult<()> {
        let para = Mailbox::new(
            Some(mensagem.para_nome.clone()),
            mensagem
                .para_email
                .parse()
                .map_err(|e| AppError::MailError(format!("destinatário inválido: {}", e)))?,
        );
        let email = Message::builder()
            .from(self.remetente.clone())
            .to(para)
            .subject(mensagem.assunto.clone())
            .header(ContentType::TEXT_HTML)
            .body(mensagem.corpo_html.clone())
            .map_err(|e| AppError::MailError(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::MailError(e.to_string()))?;
        tracing::info!("📧 Email '{}' enviado para {}", mensagem.assunto, mensagem.para_email);
        Ok(())
    }
}

/// Usado quando não há SMTP configurado: só regista a mensagem.
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn enviar(&self, mensagem: &MensagemEmail) -> AppResult<()> {
        tracing::info!(
            "📭 SMTP não configurado. Email '{}' para {} não enviado.",
            mensagem.assunto,
            mensagem.para_email
        );
        tracing::debug!("Corpo do email:\n{}", mensagem.corpo_html);
        Ok(())
    }
}

pub fn criar_transport(config: &AppConfig) -> AppResult<Arc<dyn MailTransport>> {
    match &config.smtp {
        Some(smtp) => {
            tracing::info!("📧 Envio de email via SMTP {}:{}", smtp.host, smtp.port);
            Ok(Arc::new(SmtpMailer::new(smtp, &config.mail_from)?))
        }
        None => {
            tracing::warn!("⚠️ SMTP_HOST não definida: emails serão apenas registados no log.");
            Ok(Arc::new(LogMailer))
        }
    }
}

/// Entrega em segundo plano; quem chama não espera nem vê falhas.
pub fn enfileirar(transport: Arc<dyn MailTransport>, mensagem: MensagemEmail) {
    tokio::spawn(async move {
        if let Err(e) = transport.enviar(&mensagem).await {
            tracing::error!("Falha ao enviar email para {}: {:?}", mensagem.para_email, e);
        }
    });
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::evento::evento_de_teste;
    use chrono::NaiveDate;
    use tokio::sync::Mutex;

    /// Transporte que guarda as mensagens em memória.
    #[derive(Default)]
    pub(crate) struct MemoryMailer {
        pub enviadas: Mutex<Vec<MensagemEmail>>,
    }

    #[async_trait]
    impl MailTransport for MemoryMailer {
        async fn enviar(&self, mensagem: &MensagemEmail) -> AppResult<()> {
            self.enviadas.lock().await.push(mensagem.clone());
            Ok(())
        }
    }

    fn participante(nome: &str) -> Participante {
        Participante {
            id: 7,
            nome: nome.to_string(),
            cpf: "12345678901".into(),
            telefone: "48998877665".into(),
            email: "ana@mail.com".into(),
            created_at: None,
        }
    }

    #[test]
    fn confirmacao_tem_assunto_fixo_e_dados() {
        let msg = compor_confirmacao(&participante("Ana Souza"), &evento_de_teste()).unwrap();
        assert_eq!(msg.assunto, "Inscrição realizada!");
        assert_eq!(msg.para_email, "ana@mail.com");
        assert!(msg.corpo_html.contains("Ana Souza"));
        assert!(msg.corpo_html.contains("Semana Acadêmica"));
        assert!(msg.corpo_html.contains("10/05/2024 08:00"));
    }

    #[test]
    fn confirmacao_com_valores_extremos() {
        let mut evento = evento_de_teste();
        evento.fim = NaiveDate::from_ymd_opt(2999, 12, 31).unwrap().and_hms_opt(23, 59, 0).unwrap();
        let msg = compor_confirmacao(&participante(""), &evento).unwrap();
        assert_eq!(msg.assunto, ASSUNTO_CONFIRMACAO);
        assert!(msg.corpo_html.contains("31/12/2999 23:59"));
    }

    #[test]
    fn nome_do_participante_e_escapado_no_email() {
        let msg = compor_confirmacao(&participante("<script>x</script>"), &evento_de_teste()).unwrap();
        assert!(!msg.corpo_html.contains("<script>"));
    }

    #[tokio::test]
    async fn log_mailer_nunca_falha() {
        let msg = compor_confirmacao(&participante("Ana"), &evento_de_teste()).unwrap();
        assert!(LogMailer.enviar(&msg).await.is_ok());
    }
}
