//! printf-style formatting of a single float, for meter labels.
//!
//! Supported: `%[flags][width][.precision]conv` with flags `-+ 0`, conversions
//! `f`/`F` (fixed point) and `e`/`E` (scientific), literal text and `%%`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("pattern {0:?} has no conversion")]
    MissingConversion(String),
    #[error("pattern {0:?} has more than one conversion")]
    ExtraConversion(String),
    #[error("unsupported conversion '%{conv}' in {pattern:?}")]
    UnsupportedConversion { pattern: String, conv: char },
    #[error("pattern {0:?} ends inside a conversion")]
    Unterminated(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notation {
    Fixed,
    Exponent { upper: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Conversion {
    left_align: bool,
    plus: bool,
    space: bool,
    zero_pad: bool,
    width: usize,
    precision: usize,
    notation: Notation,
}

/// A parsed one-float pattern such as `"%.2f"` or `"%+08.3f dB"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatFormat {
    prefix: String,
    conversion: Conversion,
    suffix: String,
}

impl FloatFormat {
    pub fn parse(pattern: &str) -> Result<Self, FormatError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut conversion = None;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            let literal = if conversion.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };
            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }
            if conversion.is_some() {
                return Err(FormatError::ExtraConversion(pattern.to_string()));
            }

            let mut conv = Conversion {
                left_align: false,
                plus: false,
                space: false,
                zero_pad: false,
                width: 0,
                precision: 6,
                notation: Notation::Fixed,
            };
            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => conv.left_align = true,
                    '+' => conv.plus = true,
                    ' ' => conv.space = true,
                    '0' => conv.zero_pad = true,
                    _ => break,
                }
                chars.next();
            }
            conv.width = take_number(&mut chars).unwrap_or(0);
            if chars.peek() == Some(&'.') {
                chars.next();
                // "%.f" means precision zero, as in C
                conv.precision = take_number(&mut chars).unwrap_or(0);
            }
            conv.notation = match chars.next() {
                Some('f' | 'F') => Notation::Fixed,
                Some('e') => Notation::Exponent { upper: false },
                Some('E') => Notation::Exponent { upper: true },
                Some(other) => {
                    return Err(FormatError::UnsupportedConversion {
                        pattern: pattern.to_string(),
                        conv: other,
                    })
                }
                None => return Err(FormatError::Unterminated(pattern.to_string())),
            };
            conversion = Some(conv);
        }

        let conversion =
            conversion.ok_or_else(|| FormatError::MissingConversion(pattern.to_string()))?;
        Ok(Self {
            prefix,
            conversion,
            suffix,
        })
    }

    pub fn format(&self, value: f64) -> String {
        let conv = &self.conversion;
        let sign = if value.is_sign_negative() && !value.is_nan() {
            "-"
        } else if conv.plus {
            "+"
        } else if conv.space {
            " "
        } else {
            ""
        };

        let magnitude = value.abs();
        let digits = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            "Inf".to_string()
        } else {
            match conv.notation {
                Notation::Fixed => format!("{:.*}", conv.precision, magnitude),
                Notation::Exponent { upper } => exponent(magnitude, conv.precision, upper),
            }
        };

        let len = sign.len() + digits.len();
        let fill = conv.width.saturating_sub(len);
        let body = if fill == 0 {
            format!("{sign}{digits}")
        } else if conv.left_align {
            format!("{sign}{digits}{}", " ".repeat(fill))
        } else if conv.zero_pad && value.is_finite() {
            format!("{sign}{}{digits}", "0".repeat(fill))
        } else {
            format!("{}{sign}{digits}", " ".repeat(fill))
        };

        format!("{}{}{}", self.prefix, body, self.suffix)
    }
}

impl FromStr for FloatFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FloatFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conv = &self.conversion;
        let escape = |s: &str| s.replace('%', "%%");
        write!(f, "{}%", escape(&self.prefix))?;
        for (set, flag) in [
            (conv.left_align, '-'),
            (conv.plus, '+'),
            (conv.space, ' '),
            (conv.zero_pad, '0'),
        ] {
            if set {
                write!(f, "{flag}")?;
            }
        }
        if conv.width > 0 {
            write!(f, "{}", conv.width)?;
        }
        let letter = match conv.notation {
            Notation::Fixed => 'f',
            Notation::Exponent { upper: false } => 'e',
            Notation::Exponent { upper: true } => 'E',
        };
        write!(f, ".{}{}{}", conv.precision, letter, escape(&self.suffix))
    }
}

/// Format `value` with a one-float printf pattern.
pub fn sprintf(pattern: &str, value: f64) -> Result<String, FormatError> {
    Ok(FloatFormat::parse(pattern)?.format(value))
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut number: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        number = Some(number.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
    }
    number
}

// Rust prints "1.5e2"; printf wants "1.5e+02".
fn exponent(magnitude: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, magnitude);
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let e = if upper { 'E' } else { 'e' };
    let exp_sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{exp_sign}{:02}", exp.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern() {
        assert_eq!(sprintf("%.2f", 28.0).unwrap(), "28.00");
        assert_eq!(sprintf("%.2f", -3.14159).unwrap(), "-3.14");
    }

    #[test]
    fn zero_precision_rounds() {
        assert_eq!(sprintf("%.0f", 7.0).unwrap(), "7");
        assert_eq!(sprintf("%.0f", 116.6).unwrap(), "117");
        assert_eq!(sprintf("%.f", 2.4).unwrap(), "2");
    }

    #[test]
    fn default_precision_is_six() {
        assert_eq!(sprintf("%f", 1.5).unwrap(), "1.500000");
    }

    #[test]
    fn width_and_flags() {
        assert_eq!(sprintf("%6.1f", 3.24).unwrap(), "   3.2");
        assert_eq!(sprintf("%-6.1f|", 3.0).unwrap(), "3.0   |");
        assert_eq!(sprintf("%06.1f", -3.0).unwrap(), "-003.0");
        assert_eq!(sprintf("%+.1f", 3.0).unwrap(), "+3.0");
        assert_eq!(sprintf("% .1f", 3.0).unwrap(), " 3.0");
    }

    #[test]
    fn literals_around_conversion() {
        assert_eq!(sprintf("%.1f%%", 42.0).unwrap(), "42.0%");
        assert_eq!(sprintf("T=%.0f C", 21.4).unwrap(), "T=21 C");
    }

    #[test]
    fn scientific() {
        assert_eq!(sprintf("%.2e", 150.0).unwrap(), "1.50e+02");
        assert_eq!(sprintf("%.1E", 0.00012).unwrap(), "1.2E-04");
    }

    #[test]
    fn non_finite() {
        assert_eq!(sprintf("%.2f", f64::NAN).unwrap(), "NaN");
        assert_eq!(sprintf("%.2f", f64::INFINITY).unwrap(), "Inf");
        assert_eq!(sprintf("%+.2f", f64::INFINITY).unwrap(), "+Inf");
        assert_eq!(sprintf("%05.1f", f64::NEG_INFINITY).unwrap(), " -Inf");
    }

    #[test]
    fn rejects_bad_patterns() {
        assert!(matches!(
            sprintf("value", 1.0),
            Err(FormatError::MissingConversion(_))
        ));
        assert!(matches!(
            sprintf("%.1f..%.1f", 1.0),
            Err(FormatError::ExtraConversion(_))
        ));
        assert!(matches!(
            sprintf("%d", 1.0),
            Err(FormatError::UnsupportedConversion { conv: 'd', .. })
        ));
        assert!(matches!(sprintf("%.2", 1.0), Err(FormatError::Unterminated(_))));
    }

    #[test]
    fn display_normalizes_pattern() {
        let format: FloatFormat = "%-8.3e%%".parse().unwrap();
        assert_eq!(format.to_string(), "%-8.3e%%");
        assert_eq!(FloatFormat::parse("%f").unwrap().to_string(), "%.6f");
    }
}
