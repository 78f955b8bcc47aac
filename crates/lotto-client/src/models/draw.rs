use chrono::{NaiveDate, NaiveDateTime};
use lotto_stats::{BallError, DrawBalls, MAIN_BALL_COUNT};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

/// Column names of a draw record, in the positional order the results
/// endpoint returns them and the order they are persisted in.
pub static COLUMNS: [&str; FIELD_COUNT] = [
    "drawNumber",
    "drawDate",
    "nextDrawDate",
    "ball1",
    "ball2",
    "ball3",
    "ball4",
    "ball5",
    "ball6",
    "bonusBall",
    "div1Winners",
    "div1Payout",
    "div2Winners",
    "div2Payout",
    "div3Winners",
    "div3Payout",
    "div4Winners",
    "div4Payout",
    "div5Winners",
    "div5Payout",
    "div6Winners",
    "div6Payout",
    "div7Winners",
    "div7Payout",
    "div8Winners",
    "div8Payout",
    "rolloverAmount",
    "rolloverNumber",
    "totalPrizePool",
    "totalSales",
    "estimatedJackpot",
    "guaranteedJackpot",
    "drawMachine",
    "ballSet",
    "status",
    "ecwinners",
    "mpwinners",
    "ncwinners",
    "gpwinners",
    "wcwinners",
    "fswinners",
    "kznwinners",
    "nwwinners",
    "winners",
    "millionairs",
    "lpwinners",
];

pub const FIELD_COUNT: usize = 46;

/// Columns before the passenger fields: number, two dates, six balls, bonus.
const TYPED_FIELD_COUNT: usize = 3 + MAIN_BALL_COUNT + 1;

/// Passenger columns, carried through storage but never interpreted.
pub fn extra_columns() -> &'static [&'static str] {
    &COLUMNS[TYPED_FIELD_COUNT..]
}

const DRAW_NUMBER: usize = 0;
const DRAW_DATE: usize = 1;
const NEXT_DRAW_DATE: usize = 2;
const FIRST_BALL: usize = 3;
const BONUS_BALL: usize = FIRST_BALL + MAIN_BALL_COUNT;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Persisted date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One lottery draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawRecord {
    pub draw_number: u32,
    pub draw_date: NaiveDate,
    pub next_draw_date: NaiveDate,
    pub balls: DrawBalls,
    /// Values of [`extra_columns`], same order, same length.
    extras: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed record: expected 46 fields, got {0}")]
    FieldCount(usize),
    #[error("malformed record: field `{column}` has invalid value `{value}`: {reason}")]
    InvalidField {
        column: &'static str,
        value: String,
        reason: String,
    },
}

impl DecodeError {
    fn invalid(index: usize, value: impl Display, reason: impl Display) -> Self {
        Self::InvalidField {
            column: COLUMNS[index],
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl DrawRecord {
    /// Create a record with empty passenger fields.
    pub fn new(
        draw_number: u32,
        draw_date: NaiveDate,
        next_draw_date: NaiveDate,
        balls: DrawBalls,
    ) -> Self {
        Self {
            draw_number,
            draw_date,
            next_draw_date,
            balls,
            extras: vec![String::new(); extra_columns().len()],
        }
    }

    /// Decode the 46 positional values of a results response.
    pub fn from_json_fields(fields: &[Value]) -> Result<Self, DecodeError> {
        if fields.len() != FIELD_COUNT {
            return Err(DecodeError::FieldCount(fields.len()));
        }
        let texts: Vec<String> = fields.iter().map(json_to_text).collect();
        Self::from_text_fields(&texts)
    }

    /// Decode the 46 values of a persisted row, in [`COLUMNS`] order.
    pub fn from_text_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DecodeError> {
        if fields.len() != FIELD_COUNT {
            return Err(DecodeError::FieldCount(fields.len()));
        }
        let field = |index: usize| fields[index].as_ref().trim();

        let draw_number = parse_integer::<u32>(DRAW_NUMBER, field(DRAW_NUMBER))?;
        let draw_date = parse_date(DRAW_DATE, field(DRAW_DATE))?;
        let next_draw_date = parse_date(NEXT_DRAW_DATE, field(NEXT_DRAW_DATE))?;

        let mut main = [0u8; MAIN_BALL_COUNT];
        for (offset, slot) in main.iter_mut().enumerate() {
            let index = FIRST_BALL + offset;
            *slot = parse_integer::<u8>(index, field(index))?;
        }
        let bonus = parse_integer::<u8>(BONUS_BALL, field(BONUS_BALL))?;

        let balls = DrawBalls::new(&main, bonus).map_err(|e| {
            let index = match e {
                BallError::MainBallOutOfRange(ball) => main
                    .iter()
                    .position(|&b| b == ball)
                    .map_or(FIRST_BALL, |p| FIRST_BALL + p),
                BallError::BonusBallOutOfRange(_) => BONUS_BALL,
                BallError::InvalidMainBallCount(_) => FIRST_BALL,
            };
            DecodeError::invalid(index, field(index), e)
        })?;

        let extras = fields[TYPED_FIELD_COUNT..]
            .iter()
            .map(|s| s.as_ref().to_owned())
            .collect();

        Ok(Self {
            draw_number,
            draw_date,
            next_draw_date,
            balls,
            extras,
        })
    }

    /// All 46 values as persisted text, in [`COLUMNS`] order.
    pub fn to_text_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(FIELD_COUNT);
        fields.push(self.draw_number.to_string());
        fields.push(self.draw_date.format(DATE_FORMAT).to_string());
        fields.push(self.next_draw_date.format(DATE_FORMAT).to_string());
        fields.extend(self.balls.all().iter().map(u8::to_string));
        fields.extend(self.extras.iter().cloned());
        fields
    }

    /// Passenger value by column name.
    pub fn extra(&self, column: &str) -> Option<&str> {
        extra_columns()
            .iter()
            .position(|&c| c == column)
            .and_then(|i| self.extras.get(i))
            .map(String::as_str)
    }

    /// Set a passenger value. Returns `false` if `column` is not a passenger column.
    pub fn set_extra(&mut self, column: &str, value: impl Into<String>) -> bool {
        match extra_columns().iter().position(|&c| c == column) {
            Some(i) => {
                self.extras[i] = value.into();
                true
            }
            None => false,
        }
    }
}

impl Display for DrawRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {}",
            self.draw_number,
            self.draw_date.format(DATE_FORMAT),
            self.balls
        )
    }
}

fn json_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_integer<T: std::str::FromStr>(index: usize, raw: &str) -> Result<T, DecodeError>
where
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|e| DecodeError::invalid(index, raw, e))
}

/// Parse a date, tolerating a trailing time component.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_date(index: usize, raw: &str) -> Result<NaiveDate, DecodeError> {
    parse_date_text(raw).ok_or_else(|| DecodeError::invalid(index, raw, "not a recognised date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_fields() -> Vec<Value> {
        let mut fields = vec![
            json!("1500"),
            json!("2014/12/31"),
            json!("2015/01/03"),
            json!(3),
            json!("8"),
            json!(14),
            json!("19"),
            json!(27),
            json!(31),
            json!("37"),
        ];
        fields.extend((0..extra_columns().len()).map(|i| json!(i)));
        fields
    }

    #[test]
    fn extra_columns_split() {
        assert_eq!(extra_columns().len(), 36);
        assert_eq!(extra_columns()[0], "div1Winners");
        assert_eq!(extra_columns()[35], "lpwinners");
    }

    #[test]
    fn decodes_mixed_json_types() -> anyhow::Result<()> {
        let record = DrawRecord::from_json_fields(&sample_fields())?;

        assert_eq!(record.draw_number, 1500);
        assert_eq!(record.draw_date.to_string(), "2014-12-31");
        assert_eq!(record.next_draw_date.to_string(), "2015-01-03");
        assert_eq!(record.balls.main, [3, 8, 14, 19, 27, 31]);
        assert_eq!(record.balls.bonus, 37);
        assert_eq!(record.extra("div1Winners"), Some("0"));
        assert_eq!(record.extra("lpwinners"), Some("35"));
        assert_eq!(record.extra("ball1"), None);
        Ok(())
    }

    #[test]
    fn rejects_undersized_response() {
        let mut fields = sample_fields();
        fields.truncate(45);
        assert_eq!(
            DrawRecord::from_json_fields(&fields),
            Err(DecodeError::FieldCount(45))
        );
    }

    #[test]
    fn rejects_non_numeric_ball() {
        let mut fields = sample_fields();
        fields[5] = json!("eight");
        let err = DrawRecord::from_json_fields(&fields);
        assert!(matches!(
            err,
            Err(DecodeError::InvalidField { column: "ball3", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_ball() {
        let mut fields = sample_fields();
        fields[7] = json!(53);
        let err = DrawRecord::from_json_fields(&fields);
        assert!(matches!(
            err,
            Err(DecodeError::InvalidField { column: "ball5", .. })
        ));

        let mut fields = sample_fields();
        fields[9] = json!(0);
        assert!(matches!(
            DrawRecord::from_json_fields(&fields),
            Err(DecodeError::InvalidField { column: "bonusBall", .. })
        ));
    }

    #[test]
    fn rejects_bad_date() {
        let mut fields = sample_fields();
        fields[1] = json!("yesterday");
        assert!(matches!(
            DrawRecord::from_json_fields(&fields),
            Err(DecodeError::InvalidField { column: "drawDate", .. })
        ));
    }

    #[test]
    fn text_fields_round_trip_keeps_passengers() -> anyhow::Result<()> {
        let record = DrawRecord::from_json_fields(&sample_fields())?;
        let text = record.to_text_fields();

        assert_eq!(text.len(), FIELD_COUNT);
        assert_eq!(text[1], "2014-12-31");
        assert_eq!(DrawRecord::from_text_fields(&text)?, record);
        Ok(())
    }

    #[test]
    fn parse_date_accepts_time_suffix() {
        assert_eq!(
            parse_date_text("2020-01-01 00:00:00").map(|d| d.to_string()),
            Some("2020-01-01".to_owned())
        );
        assert_eq!(parse_date_text("01-01-2020"), None);
    }

    #[test]
    fn set_extra_only_touches_passengers() -> anyhow::Result<()> {
        let balls = DrawBalls::new(&[1, 2, 3, 4, 5, 6], 7)?;
        let date = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap_or_else(|| panic!("invalid fixture date"));
        let mut record = DrawRecord::new(1, date, date, balls);

        assert!(record.set_extra("status", "closed"));
        assert!(!record.set_extra("drawNumber", "2"));
        assert_eq!(record.extra("status"), Some("closed"));
        Ok(())
    }
}
