//! Rejilla canónica de turnos del día.
//!
//! Las etiquetas tienen la forma `H:MM AM/PM` ("7:00 PM"). Se normalizan al
//! parsear, de modo que "07:00 pm" y "7:00 PM" son el mismo turno.

use chrono::NaiveTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub label: String,
    pub time: NaiveTime,
}

/// Turnos reservables, siempre en orden cronológico y sin duplicados
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotGrid {
    slots: Vec<Slot>,
}

/// Parsea una etiqueta de turno a hora del día
pub fn parse_label(label: &str) -> Option<NaiveTime> {
    let normalized = label.trim().to_uppercase();
    NaiveTime::parse_from_str(&normalized, "%I:%M %p").ok()
}

/// Etiqueta canónica para una hora del día
pub fn format_label(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

impl SlotGrid {
    /// Construye la rejilla; devuelve la primera etiqueta inválida como error
    pub fn parse<S: AsRef<str>>(labels: &[S]) -> Result<Self, String> {
        let mut slots = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref();
            let time = parse_label(label).ok_or_else(|| label.to_string())?;
            slots.push(Slot {
                label: format_label(time),
                time,
            });
        }
        slots.sort_by_key(|slot| slot.time);
        slots.dedup_by_key(|slot| slot.time);
        Ok(SlotGrid { slots })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn labels(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Busca el turno de la rejilla que corresponde a una etiqueta
    pub fn find(&self, label: &str) -> Option<&Slot> {
        let time = parse_label(label)?;
        self.slots.iter().find(|slot| slot.time == time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_sorted_and_deduplicated() {
        let grid = SlotGrid::parse(&["9:00 PM", "7:00 PM", "07:00 pm", "10:30 AM"]).unwrap();
        assert_eq!(grid.labels(), vec!["10:30 AM", "7:00 PM", "9:00 PM"]);
    }

    #[test]
    fn noon_and_midnight_labels() {
        let grid = SlotGrid::parse(&["12:00 PM", "12:00 AM"]).unwrap();
        assert_eq!(grid.labels(), vec!["12:00 AM", "12:00 PM"]);
        assert_eq!(grid.slots()[1].time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn find_matches_equivalent_labels_only() {
        let grid = SlotGrid::parse(&["7:00 PM"]).unwrap();
        assert_eq!(grid.find(" 07:00 PM").map(|s| s.label.as_str()), Some("7:00 PM"));
        assert!(grid.find("7:30 PM").is_none());
        assert!(grid.find("19:00").is_none());
    }

    #[test]
    fn invalid_label_is_reported() {
        assert_eq!(SlotGrid::parse(&["7 PM"]), Err("7 PM".to_string()));
    }
}
