use super::SampleValue;
use crate::reflect::Primitive;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Deterministic samples for [`Primitive`] types.
///
/// Every call advances a counter that seeds the value, so consecutive samples
/// are visibly distinct (`"sample string 1"`, `"sample string 2"`, ..).
/// Date samples use the time captured when the generator was created.
#[derive(Debug, Clone)]
pub struct SimpleSampleGenerator {
    index: u64,
    reference_time: DateTime<Utc>,
}

impl Default for SimpleSampleGenerator {
    fn default() -> Self {
        Self::with_reference_time(Utc::now())
    }
}

impl SimpleSampleGenerator {
    #[must_use]
    pub fn with_reference_time(reference_time: DateTime<Utc>) -> Self {
        Self {
            index: 0,
            reference_time,
        }
    }

    /// Number of samples produced so far.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn generate(&mut self, primitive: Primitive) -> SampleValue {
        self.index += 1;
        let index = self.index;
        match primitive {
            Primitive::Boolean => SampleValue::Bool(true),
            Primitive::Byte => SampleValue::UInt(64),
            Primitive::SByte => SampleValue::Int(64),
            Primitive::Char => SampleValue::String("A".to_string()),
            Primitive::Int16 => SampleValue::Int((index % i16::MAX as u64) as i64),
            Primitive::Int32 => SampleValue::Int((index % i32::MAX as u64) as i64),
            Primitive::Int64 => SampleValue::Int((index % i64::MAX as u64) as i64),
            Primitive::UInt16 => SampleValue::UInt(index % u64::from(u16::MAX)),
            Primitive::UInt32 => SampleValue::UInt(index % u64::from(u32::MAX)),
            Primitive::UInt64 => SampleValue::UInt(index),
            Primitive::Decimal => SampleValue::Float(index as f64),
            Primitive::Single | Primitive::Double => SampleValue::Float(index as f64 + 0.1),
            Primitive::String => SampleValue::String(format!("sample string {}", index)),
            Primitive::Guid => serialized(&Uuid::from_u128(u128::from(index))),
            Primitive::Uri => match Url::parse(&format!("http://webapihelppage{}.com", index)) {
                Ok(url) => serialized(&url),
                Err(_) => SampleValue::Null,
            },
            Primitive::TimeSpan => serialized(&Duration::from_nanos(123_456_700)),
            Primitive::DateTime => serialized(&self.reference_time),
            Primitive::DateTimeOffset => serialized(&self.reference_time.fixed_offset()),
            Primitive::Date => serialized(&self.reference_time.date_naive()),
        }
    }
}

fn serialized<T: Serialize>(value: &T) -> SampleValue {
    SampleValue::from_serialize(value).unwrap_or(SampleValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn generator() -> SimpleSampleGenerator {
        let reference_time = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).single().unwrap();
        SimpleSampleGenerator::with_reference_time(reference_time)
    }

    #[test]
    fn test_counter_seeds_values() {
        let mut generator = generator();
        assert_eq!(
            generator.generate(Primitive::String),
            SampleValue::String("sample string 1".into())
        );
        assert_eq!(generator.generate(Primitive::Int32), SampleValue::Int(2));
        assert_eq!(generator.generate(Primitive::Double), SampleValue::Float(3.1));
        assert_eq!(generator.generate(Primitive::Decimal), SampleValue::Float(4.0));
        assert_eq!(generator.index(), 4);
    }

    #[test]
    fn test_fixed_values() {
        let mut generator = generator();
        assert_eq!(generator.generate(Primitive::Boolean), SampleValue::Bool(true));
        assert_eq!(generator.generate(Primitive::Byte), SampleValue::UInt(64));
        assert_eq!(
            generator.generate(Primitive::Char),
            SampleValue::String("A".into())
        );
    }

    #[test]
    fn test_serialized_wire_forms() {
        let mut generator = generator();
        assert_eq!(
            generator.generate(Primitive::Guid),
            SampleValue::String("00000000-0000-0000-0000-000000000001".into())
        );
        assert_eq!(
            generator.generate(Primitive::Uri),
            SampleValue::String("http://webapihelppage2.com/".into())
        );
        assert_eq!(
            generator.generate(Primitive::DateTime),
            SampleValue::String("2024-05-17T08:30:00Z".into())
        );
        assert_eq!(
            generator.generate(Primitive::Date),
            SampleValue::String("2024-05-17".into())
        );
    }
}
