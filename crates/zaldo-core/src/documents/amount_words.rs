use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ZaldoError;
use crate::types::*;
use crate::ZaldoResult;

/// Largest amount the words renderer handles (just under a billion pesos,
/// long scale).
pub const MAX_AMOUNT_IN_WORDS: u64 = 999_999_999_999;

const UNITS: [&str; 30] = [
    "CERO",
    "UN",
    "DOS",
    "TRES",
    "CUATRO",
    "CINCO",
    "SEIS",
    "SIETE",
    "OCHO",
    "NUEVE",
    "DIEZ",
    "ONCE",
    "DOCE",
    "TRECE",
    "CATORCE",
    "QUINCE",
    "DIECISÉIS",
    "DIECISIETE",
    "DIECIOCHO",
    "DIECINUEVE",
    "VEINTE",
    "VEINTIÚN",
    "VEINTIDÓS",
    "VEINTITRÉS",
    "VEINTICUATRO",
    "VEINTICINCO",
    "VEINTISÉIS",
    "VEINTISIETE",
    "VEINTIOCHO",
    "VEINTINUEVE",
];

const TENS: [&str; 10] = [
    "", "", "", "TREINTA", "CUARENTA", "CINCUENTA", "SESENTA", "SETENTA", "OCHENTA", "NOVENTA",
];

const HUNDREDS: [&str; 10] = [
    "",
    "CIENTO",
    "DOSCIENTOS",
    "TRESCIENTOS",
    "CUATROCIENTOS",
    "QUINIENTOS",
    "SEISCIENTOS",
    "SETECIENTOS",
    "OCHOCIENTOS",
    "NOVECIENTOS",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountWordsInput {
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountWordsOutput {
    pub amount: Money,
    /// "$ 1.000.000"
    pub formatted: String,
    /// "UN MILLÓN DE PESOS MONEDA CORRIENTE"
    pub words: String,
}

/// Legal wording of a peso amount for promissory notes and receipts.
///
/// Centavos are dropped. Number words precede a noun, so "uno" is always
/// shortened: "VEINTIÚN MIL", "UN MILLÓN".
pub fn amount_in_words(amount: Money) -> ZaldoResult<String> {
    let pesos = whole_pesos(amount)?;
    let words = integer_words(pesos);
    let suffix = match pesos {
        1 => "PESO MONEDA CORRIENTE",
        n if n > 0 && n % 1_000_000 == 0 => "DE PESOS MONEDA CORRIENTE",
        _ => "PESOS MONEDA CORRIENTE",
    };
    Ok(format!("{words} {suffix}"))
}

/// Colombian peso formatting: "$ 1.250.000".
pub fn format_cop(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-$ {grouped}")
    } else {
        format!("$ {grouped}")
    }
}

pub fn render_amount(input: &AmountWordsInput) -> ZaldoResult<ComputationOutput<AmountWordsOutput>> {
    let start = Instant::now();
    let words = amount_in_words(input.amount)?;
    let mut warnings = Vec::new();
    if input.amount.fract() != Decimal::ZERO {
        warnings.push(format!(
            "centavos in {} are not written out",
            input.amount
        ));
    }

    let output = AmountWordsOutput {
        amount: input.amount,
        formatted: format_cop(input.amount),
        words,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Spanish amount in words (long scale, apocopated before nouns)",
        &serde_json::json!({ "currency": "COP" }),
        warnings,
        elapsed,
        output,
    ))
}

fn whole_pesos(amount: Money) -> ZaldoResult<u64> {
    if amount < Decimal::ZERO {
        return Err(ZaldoError::InvalidInput {
            field: "amount".into(),
            reason: "Amount in words requires a non-negative amount".into(),
        });
    }
    amount
        .trunc()
        .to_u64()
        .filter(|n| *n <= MAX_AMOUNT_IN_WORDS)
        .ok_or_else(|| ZaldoError::InvalidInput {
            field: "amount".into(),
            reason: format!("Amount in words supports up to {MAX_AMOUNT_IN_WORDS}"),
        })
}

fn integer_words(n: u64) -> String {
    if n == 0 {
        return UNITS[0].to_string();
    }
    let millions = n / 1_000_000;
    let rest = n % 1_000_000;

    let mut parts: Vec<String> = Vec::new();
    match millions {
        0 => {}
        1 => parts.push("UN MILLÓN".to_string()),
        m => parts.push(format!("{} MILLONES", below_million(m))),
    }
    if rest > 0 {
        parts.push(below_million(rest));
    }
    parts.join(" ")
}

fn below_million(n: u64) -> String {
    let thousands = n / 1000;
    let rest = n % 1000;

    let mut parts: Vec<String> = Vec::new();
    match thousands {
        0 => {}
        1 => parts.push("MIL".to_string()),
        t => parts.push(format!("{} MIL", below_thousand(t))),
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

fn below_thousand(n: u64) -> String {
    if n == 100 {
        return "CIEN".to_string();
    }
    let hundreds = (n / 100) as usize;
    let rest = (n % 100) as usize;

    let mut parts: Vec<String> = Vec::new();
    if hundreds > 0 {
        parts.push(HUNDREDS[hundreds].to_string());
    }
    if rest > 0 {
        if rest < 30 {
            parts.push(UNITS[rest].to_string());
        } else if rest % 10 == 0 {
            parts.push(TENS[rest / 10].to_string());
        } else {
            parts.push(format!("{} Y {}", TENS[rest / 10], UNITS[rest % 10]));
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_millions_take_de() {
        assert_eq!(
            amount_in_words(dec!(1_000_000)).unwrap(),
            "UN MILLÓN DE PESOS MONEDA CORRIENTE"
        );
        assert_eq!(
            amount_in_words(dec!(2_000_000)).unwrap(),
            "DOS MILLONES DE PESOS MONEDA CORRIENTE"
        );
        assert_eq!(
            amount_in_words(dec!(1_000_000_000)).unwrap(),
            "MIL MILLONES DE PESOS MONEDA CORRIENTE"
        );
    }

    #[test]
    fn test_typical_loan_amounts() {
        assert_eq!(
            amount_in_words(dec!(1_500_000)).unwrap(),
            "UN MILLÓN QUINIENTOS MIL PESOS MONEDA CORRIENTE"
        );
        assert_eq!(
            amount_in_words(dec!(250_000)).unwrap(),
            "DOSCIENTOS CINCUENTA MIL PESOS MONEDA CORRIENTE"
        );
        assert_eq!(
            amount_in_words(dec!(100_000)).unwrap(),
            "CIEN MIL PESOS MONEDA CORRIENTE"
        );
    }

    #[test]
    fn test_apocope_and_compounds() {
        assert_eq!(
            amount_in_words(dec!(21_000)).unwrap(),
            "VEINTIÚN MIL PESOS MONEDA CORRIENTE"
        );
        assert_eq!(
            amount_in_words(dec!(31_531)).unwrap(),
            "TREINTA Y UN MIL QUINIENTOS TREINTA Y UN PESOS MONEDA CORRIENTE"
        );
        assert_eq!(
            amount_in_words(dec!(101_116)).unwrap(),
            "CIENTO UN MIL CIENTO DIECISÉIS PESOS MONEDA CORRIENTE"
        );
        assert_eq!(
            amount_in_words(dec!(12_345_678)).unwrap(),
            "DOCE MILLONES TRESCIENTOS CUARENTA Y CINCO MIL SEISCIENTOS SETENTA Y OCHO PESOS MONEDA CORRIENTE"
        );
    }

    #[test]
    fn test_zero_and_one() {
        assert_eq!(
            amount_in_words(Decimal::ZERO).unwrap(),
            "CERO PESOS MONEDA CORRIENTE"
        );
        assert_eq!(
            amount_in_words(dec!(1)).unwrap(),
            "UN PESO MONEDA CORRIENTE"
        );
    }

    #[test]
    fn test_centavos_dropped() {
        assert_eq!(
            amount_in_words(dec!(60_000.75)).unwrap(),
            "SESENTA MIL PESOS MONEDA CORRIENTE"
        );
    }

    #[test]
    fn test_out_of_range() {
        assert!(amount_in_words(dec!(-1)).is_err());
        assert!(amount_in_words(dec!(1_000_000_000_000)).is_err());
    }

    #[test]
    fn test_format_cop() {
        assert_eq!(format_cop(dec!(1_000_000)), "$ 1.000.000");
        assert_eq!(format_cop(dec!(999)), "$ 999");
        assert_eq!(format_cop(dec!(60_000.5)), "$ 60.001");
        assert_eq!(format_cop(dec!(-40_000)), "-$ 40.000");
        assert_eq!(format_cop(Decimal::ZERO), "$ 0");
    }

    #[test]
    fn test_render_warns_on_centavos() {
        let out = render_amount(&AmountWordsInput {
            amount: dec!(10.5),
        })
        .unwrap();
        assert_eq!(out.result.words, "DIEZ PESOS MONEDA CORRIENTE");
        assert_eq!(out.warnings.len(), 1);
    }
}
