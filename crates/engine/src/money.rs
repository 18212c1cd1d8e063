use std::{fmt, ops::Mul};

/// Amount in **whole reais** (BRL).
///
/// Every price on the site is a whole number of reais, so cents are only
/// ever rendered, never stored.
///
/// # Examples
///
/// ```rust
/// use engine::Reais;
///
/// let revenue = Reais::new(70) * 20;
/// assert_eq!(revenue.to_string(), "R$ 1.400");
/// assert_eq!(Reais::new(70).with_cents(), "R$ 70,00");
/// assert_eq!(Reais::new(70).pix_amount(), "70.00");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Reais(u64);

impl Reais {
    pub const ZERO: Reais = Reais(0);

    #[must_use]
    pub const fn new(reais: u64) -> Self {
        Self(reais)
    }

    /// pt-BR form with cents, e.g. `R$ 1.250,00`.
    #[must_use]
    pub fn with_cents(self) -> String {
        format!("R$ {},00", group_thousands(self.0))
    }

    /// Dot-decimal form used inside PIX codes, e.g. `70.00`.
    #[must_use]
    pub fn pix_amount(self) -> String {
        format!("{}.00", self.0)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// pt-BR form without cents, e.g. `R$ 1.400`.
impl fmt::Display for Reais {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}", group_thousands(self.0))
    }
}

impl Mul<u64> for Reais {
    type Output = Reais;

    fn mul(self, rhs: u64) -> Self::Output {
        Reais(self.0 * rhs)
    }
}
