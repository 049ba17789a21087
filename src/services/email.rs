//! Email service for sending sales receipts

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::sale::{Sale, SaleItem},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the receipt for a committed sale
    pub async fn send_receipt(
        &self,
        to: &str,
        sale: &Sale,
        items: &[SaleItem],
        shop_name: &str,
    ) -> AppResult<()> {
        let subject = format!("Your Receipt from {} - {}", shop_name, sale.receipt_no);
        let html = receipt_html(sale, items, shop_name);
        let text = format!(
            "Thank you for your purchase at {}!\n\nReceipt No: {}\nCustomer: {}\nTotal: {}\n",
            shop_name, sale.receipt_no, sale.customer_name, sale.total_amount
        );

        self.send_email(to, &subject, &text, &html).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, text: &str, html: &str) -> AppResult<()> {
        let from_name = self.config.smtp_from_name.as_deref().unwrap_or("Dukani");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            // Use STARTTLS for secure connection
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

/// Render the HTML receipt body
fn receipt_html(sale: &Sale, items: &[SaleItem], shop_name: &str) -> String {
    let rows: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<tr>
  <td style="padding: 8px 10px; border-bottom: 1px solid #eee;">{}</td>
  <td style="padding: 8px 10px; border-bottom: 1px solid #eee;">{}</td>
  <td style="padding: 8px 10px; border-bottom: 1px solid #eee; text-align: right;">{}</td>
  <td style="padding: 8px 10px; border-bottom: 1px solid #eee; text-align: right;">{}</td>
</tr>"#,
                item.model_name_at_sale, item.imei_at_sale, item.quantity, item.unit_price
            )
        })
        .collect();

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; border: 1px solid #ddd; padding: 20px;">
  <h2 style="color: #333; border-bottom: 2px solid #5cb85c; padding-bottom: 10px; text-align: center;">{shop_name}</h2>
  <p style="text-align: center; color: #777;">Thank you for your purchase!</p>
  <div style="margin-top: 20px; padding: 15px; background: #f9f9f9; border-radius: 5px;">
    <p><strong>Receipt No:</strong> {receipt_no}</p>
    <p><strong>Date:</strong> {date}</p>
    <p><strong>Customer:</strong> {customer}</p>
    <p><strong>Phone:</strong> {phone}</p>
  </div>
  <table style="width: 100%; border-collapse: collapse; margin-top: 20px;">
    <thead>
      <tr style="background: #f0f0f0;">
        <th style="padding: 10px; text-align: left;">Description</th>
        <th style="padding: 10px; text-align: left;">IMEI</th>
        <th style="padding: 10px; text-align: right;">Qty</th>
        <th style="padding: 10px; text-align: right;">Price</th>
      </tr>
    </thead>
    <tbody>{rows}</tbody>
    <tfoot>
      <tr>
        <td colspan="3" style="padding: 10px; text-align: right; font-weight: bold;">TOTAL PAID:</td>
        <td style="padding: 10px; text-align: right; font-weight: bold; color: #5cb85c;">{total}</td>
      </tr>
    </tfoot>
  </table>
  <p style="margin-top: 30px; text-align: center; font-size: 0.9em; color: #999;">
    This receipt serves as proof of purchase.
  </p>
</div>"#,
        shop_name = shop_name,
        receipt_no = sale.receipt_no,
        date = sale.sale_date.format("%Y-%m-%d %H:%M"),
        customer = sale.customer_name,
        phone = sale.customer_phone.as_deref().unwrap_or("N/A"),
        rows = rows,
        total = sale.total_amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sample_sale() -> (Sale, Vec<SaleItem>) {
        let sale_id = Uuid::new_v4();
        let sale = Sale {
            id: sale_id,
            receipt_no: "#0042".to_string(),
            sale_date: Utc::now(),
            customer_name: "Achieng Odhiambo".to_string(),
            customer_email: Some("achieng@example.com".to_string()),
            customer_phone: None,
            total_amount: dec!(12500.00),
            total_profit: dec!(1800.00),
            sold_by_user_id: Uuid::new_v4(),
            email_sent: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let items = vec![SaleItem {
            id: Uuid::new_v4(),
            sale_id,
            device_id: Uuid::new_v4(),
            model_name_at_sale: "Samsung Galaxy A14".to_string(),
            quantity: 1,
            unit_price: dec!(12500.00),
            cost_price_at_sale: dec!(10700.00),
            item_profit: dec!(1800.00),
            imei_at_sale: "351234567890123".to_string(),
            created_at: Utc::now(),
        }];
        (sale, items)
    }

    #[test]
    fn receipt_html_contains_sale_snapshot() {
        let (sale, items) = sample_sale();
        let html = receipt_html(&sale, &items, "Mama Njeri Phones");

        assert!(html.contains("Mama Njeri Phones"));
        assert!(html.contains("#0042"));
        assert!(html.contains("Achieng Odhiambo"));
        assert!(html.contains("Samsung Galaxy A14"));
        assert!(html.contains("351234567890123"));
        assert!(html.contains("12500.00"));
        // No phone supplied on this sale
        assert!(html.contains("N/A"));
    }
}
