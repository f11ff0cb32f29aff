use chrono::{Local, NaiveDate, NaiveDateTime};

/// Fuente de hora del motor: reloj del sistema o instante fijo (pruebas)
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(instant) => *instant,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
