use super::{Axis, AxisOptions, IntoAnyAxis};
use crate::axis::variant::AnyAxis;

/// A finite set of labels. Never has an underflow bin; `overflow`
/// optionally reserves a bin that collects unrecognized labels instead of
/// dropping the fill.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Categorical {
    labels: Vec<String>,
    overflow: bool,
}

impl Categorical {
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::with_overflow(labels, false)
    }

    pub fn with_overflow(
        labels: impl IntoIterator<Item = impl Into<String>>,
        overflow: bool,
    ) -> Self {
        let labels = labels.into_iter().map(Into::into).collect();
        Self { labels, overflow }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn has_overflow(&self) -> bool {
        self.overflow
    }
}

impl Axis for Categorical {
    type Value = String;

    fn extent(&self) -> u32 {
        self.labels.len() as u32 + self.overflow as u32
    }

    fn options(&self) -> AxisOptions {
        if self.overflow {
            AxisOptions::new(AxisOptions::OVERFLOW)
        } else {
            AxisOptions::none()
        }
    }

    fn update(&mut self, value: &String) -> (i32, i32) {
        match self.labels.iter().position(|label| label == value) {
            Some(i) => (i as i32, 0),
            None if self.overflow => (self.labels.len() as i32, 0),
            None => (-1, 0),
        }
    }
}

impl IntoAnyAxis for Categorical {
    fn into_any(self) -> AnyAxis {
        AnyAxis::Categorical(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_label_without_overflow_is_dropped() {
        let mut axis = Categorical::new(["a", "b"]);
        assert_eq!(axis.extent(), 2);
        assert_eq!(axis.update(&"a".to_string()).0, 0);
        assert_eq!(axis.update(&"z".to_string()), (-1, 0));
    }

    #[test]
    fn unknown_label_with_overflow_collects() {
        let mut axis = Categorical::with_overflow(["a", "b"], true);
        assert_eq!(axis.extent(), 3);
        assert_eq!(axis.update(&"z".to_string()).0, 2);
    }
}
