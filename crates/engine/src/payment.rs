//! Payment instructions shown once a registration is stored.
//!
//! The PIX code is the copy-and-paste payload a banking app reads. It is a
//! list of `ID LEN VALUE` fields closed by a CRC16 checksum field, built here
//! from fixed event constants. Nothing is charged or verified by the site.

use serde::Serialize;

use crate::{
    money::Reais,
    notice::{Clipboard, Notice, Notifier},
    registration::Registration,
};

/// PIX key receiving the registration fees.
pub const PIX_KEY: &str = "semeandofamilia@gmail.com";
/// Registration fee per runner.
pub const EVENT_PRICE: Reais = Reais::new(70);
pub const SUPPORT_PHONE: &str = "(22) 98851-6911";

const MERCHANT_NAME: &str = "N";
const MERCHANT_CITY: &str = "C";
const REFERENCE: &str = "CORRIDA";

const GUI: &str = "BR.GOV.BCB.PIX";
const CATEGORY_CODE: &str = "0000";
const CURRENCY_BRL: &str = "986";
const COUNTRY: &str = "BR";

const NOTES: [&str; 3] = [
    "Após o pagamento, sua inscrição será confirmada em até 24h",
    "Retire seu kit no dia 23 de Maio, das 09:00 às 11:30",
    "Leve um documento com foto para retirar o kit",
];

/// A static PIX charge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixCharge<'a> {
    pub key: &'a str,
    pub amount: Reais,
    pub merchant_name: &'a str,
    pub merchant_city: &'a str,
    pub reference: &'a str,
}

impl PixCharge<'static> {
    /// The charge for one event registration.
    #[must_use]
    pub const fn event() -> Self {
        Self {
            key: PIX_KEY,
            amount: EVENT_PRICE,
            merchant_name: MERCHANT_NAME,
            merchant_city: MERCHANT_CITY,
            reference: REFERENCE,
        }
    }
}

impl PixCharge<'_> {
    #[must_use]
    pub fn payload(&self) -> String {
        let account = [field("00", GUI), field("01", self.key)].concat();
        let additional = field("05", self.reference);

        let mut payload = [
            field("00", "01"),
            field("26", &account),
            field("52", CATEGORY_CODE),
            field("53", CURRENCY_BRL),
            field("54", &self.amount.pix_amount()),
            field("58", COUNTRY),
            field("59", self.merchant_name),
            field("60", self.merchant_city),
            field("62", &additional),
        ]
        .concat();

        // The checksum covers its own id and length.
        payload.push_str("6304");
        let crc = crc16_ccitt(payload.as_bytes());
        payload.push_str(&format!("{crc:04X}"));
        payload
    }
}

fn field(id: &str, value: &str) -> String {
    format!("{id}{:02}{value}", value.chars().count())
}

/// CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF).
fn crc16_ccitt(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in bytes {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Everything the payment page renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaymentScreen {
    pub name: String,
    pub sex: &'static str,
    pub age: u8,
    pub shirt_size: &'static str,
    pub amount: String,
    pub pix_key: &'static str,
    pub pix_code: String,
    pub support_phone: &'static str,
    pub support_whatsapp_url: String,
    pub notes: [&'static str; 3],
}

impl PaymentScreen {
    #[must_use]
    pub fn for_registration(registration: &Registration) -> Self {
        let charge = PixCharge::event();
        Self {
            name: registration.name.clone(),
            sex: registration.sex.label(),
            age: registration.age,
            shirt_size: registration.shirt_size.code(),
            amount: charge.amount.with_cents(),
            pix_key: charge.key,
            pix_code: charge.payload(),
            support_phone: SUPPORT_PHONE,
            support_whatsapp_url: whatsapp_url(SUPPORT_PHONE),
            notes: NOTES,
        }
    }

    /// Text placed on the clipboard by the copy button.
    #[must_use]
    pub fn clipboard_text(&self) -> &'static str {
        self.pix_key
    }

    pub fn copy_pix_key(&self, clipboard: &mut dyn Clipboard, notifier: &mut dyn Notifier) {
        clipboard.write_text(self.clipboard_text());
        notifier.notify(Notice::success("Chave PIX copiada!"));
    }
}

fn whatsapp_url(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/55{digits}")
}
