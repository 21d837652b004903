use modeldao::{GenericDao, MemorySession, Model, Result, Session};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Bus {
    #[primary_key]
    pub register: String,
    pub licence: String,
    pub r#type: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Driver {
    #[primary_key]
    #[model(column = "numDriver")]
    pub num_driver: i32,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Place {
    #[primary_key]
    #[model(column = "idPlace")]
    pub id_place: i32,
    pub city: String,
    pub cp: i32,
    pub site: String,
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Routes {
    #[primary_key]
    pub register: String,
    #[primary_key]
    #[model(column = "numDriver")]
    pub num_driver: i32,
    #[primary_key]
    #[model(column = "idPlace")]
    pub id_place: i32,
    #[model(column = "dayWeek")]
    pub day_week: String,
}

/// Tables the console can address by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityTable {
    Bus,
    Driver,
    Place,
    Routes,
}

impl EntityTable {
    pub const ALL: [EntityTable; 4] = [Self::Bus, Self::Driver, Self::Place, Self::Routes];

    pub fn name(&self) -> String {
        match self {
            Self::Bus => Bus::table_name(),
            Self::Driver => Driver::table_name(),
            Self::Place => Place::table_name(),
            Self::Routes => Routes::table_name(),
        }
    }
}

impl FromStr for EntityTable {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|table| table.name() == wanted)
            .ok_or_else(|| format!("Table '{}' not found.", s.trim()))
    }
}

impl fmt::Display for EntityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn register_tables(session: &MemorySession) -> Result<()> {
    session.create_table_for::<Bus>()?;
    session.create_table_for::<Driver>()?;
    session.create_table_for::<Place>()?;
    session.create_table_for::<Routes>()?;
    Ok(())
}

/// Inserts a small fixed data set; returns the number of rows written.
pub fn seed<S: Session + ?Sized>(session: &S) -> Result<u64> {
    let dao = GenericDao::new(session);
    let mut written = 0;

    for bus in [
        Bus {
            register: "1234-BCD".into(),
            licence: "LIC-001".into(),
            r#type: "coach".into(),
        },
        Bus {
            register: "5678-FGH".into(),
            licence: "LIC-002".into(),
            r#type: "minibus".into(),
        },
    ] {
        written += dao.insert(&bus)?.into_result()?;
    }

    let driver = Driver {
        num_driver: 7,
        name: "Ana".into(),
        surname: "Lopez".into(),
    };
    written += dao.insert(&driver)?.into_result()?;

    let place = Place {
        id_place: 1,
        city: "Madrid".into(),
        cp: 28001,
        site: "Plaza Mayor".into(),
    };
    written += dao.insert(&place)?.into_result()?;

    let route = Routes {
        register: "1234-BCD".into(),
        num_driver: 7,
        id_place: 1,
        day_week: "monday".into(),
    };
    written += dao.insert(&route)?.into_result()?;

    Ok(written)
}
