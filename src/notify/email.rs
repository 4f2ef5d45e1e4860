use anyhow::{Context, Result};
use lettre::message::{header::ContentType, Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::Mailer;
use crate::report::html_report;
use crate::table::RankedTable;

const SUBJECT: &str = "Topsis Results (Table & File)";

/// Connection settings for the SMTP relay, assembled by the config layer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    /// Overrides the default STARTTLS port (587) when set.
    pub port: Option<u16>,
    pub user: String,
    pub pass: String,
    /// Sender address for result emails.
    pub from: String,
}

/// Delivers ranked results over SMTP with STARTTLS, as an HTML table plus a
/// CSV attachment.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> Result<Self> {
        let creds = Credentials::new(cfg.user.clone(), cfg.pass.clone());
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
            .with_context(|| format!("invalid smtp host {:?}", cfg.host))?
            .credentials(creds);
        if let Some(port) = cfg.port {
            builder = builder.port(port);
        }
        let from = cfg
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("invalid sender address {:?}", cfg.from))?;
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

fn build_message(
    from: &Mailbox,
    to: Mailbox,
    filename: &str,
    table: &RankedTable,
) -> Result<Message> {
    let html = html_report(table);
    let attachment = Attachment::new(filename.to_string()).body(
        table.to_csv().into_bytes(),
        ContentType::parse("text/csv").context("csv content type")?,
    );
    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(SUBJECT)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::html(html))
                .singlepart(attachment),
        )
        .context("build email")
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send_results(&self, to: &str, filename: &str, table: &RankedTable) -> Result<()> {
        let to: Mailbox = to
            .parse()
            .with_context(|| format!("invalid recipient address {to:?}"))?;
        let msg = build_message(&self.from, to, filename, table)?;
        self.transport.send(msg).await.context("smtp send")?;
        tracing::info!(filename, "result email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RankedRow;

    fn sample() -> RankedTable {
        RankedTable {
            headers: vec![
                "Model".into(),
                "Price".into(),
                "Topsis Score".into(),
                "Rank".into(),
            ],
            rows: vec![RankedRow {
                cells: vec!["M3".into(), "4".into()],
                score: 0.6614872283,
                rank: 1,
            }],
        }
    }

    #[test]
    fn message_carries_subject_recipient_and_attachment() {
        let from: Mailbox = "Topsis Webservice <noreply@example.com>".parse().unwrap();
        let to: Mailbox = "user@example.com".parse().unwrap();
        let msg = build_message(&from, to, "result_phones.csv", &sample()).unwrap();
        let raw = String::from_utf8_lossy(&msg.formatted()).into_owned();
        assert!(raw.contains("Subject: Topsis Results (Table & File)"));
        assert!(raw.contains("To: user@example.com"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("result_phones.csv"));
        assert!(raw.contains("text/csv"));
    }

    #[test]
    fn rejects_malformed_sender() {
        let cfg = SmtpConfig {
            host: "smtp.example.com".into(),
            port: None,
            user: "u".into(),
            pass: "p".into(),
            from: "not an address".into(),
        };
        assert!(SmtpMailer::new(&cfg).is_err());
    }
}
