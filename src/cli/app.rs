use super::entities::{Bus, Driver, EntityTable, Place, Routes};
use anyhow::Result;
use modeldao::{DmlOutcome, GenericDao, LineSource, Model, Populator, QueryResult, Session};
use std::io::Write;
use tracing::warn;

const SEPARATOR: &str = "--------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Insert,
    UpdateRoutes,
    DeleteRoutes,
    QueryDriver,
    QueryRoutes,
    DeleteAll,
    List,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Insert),
            "2" => Some(Self::UpdateRoutes),
            "3" => Some(Self::DeleteRoutes),
            "4" => Some(Self::QueryDriver),
            "5" => Some(Self::QueryRoutes),
            "6" => Some(Self::DeleteAll),
            "7" => Some(Self::List),
            "8" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub fn menu() -> String {
    [
        SEPARATOR,
        "      - BUS DRIVE PLACE SGDB -",
        SEPARATOR,
        "1. Insert (Bus, Driver, Place, Routes)",
        "2. Update (Routes for week day)",
        "3. Delete (Routes asking pks)",
        "4. Query (Driver asking num driver)",
        "5. Query (Routes asking pks)",
        "6. Delete all rows of a table",
        "7. List a table",
        "8. Exit.",
        SEPARATOR,
    ]
    .join("\n")
}

macro_rules! for_table {
    ($table:expr, $app:ident . $method:ident) => {
        match $table {
            EntityTable::Bus => $app.$method::<Bus>(),
            EntityTable::Driver => $app.$method::<Driver>(),
            EntityTable::Place => $app.$method::<Place>(),
            EntityTable::Routes => $app.$method::<Routes>(),
        }
    };
}

/// Menu-driven console over the bus/driver/place/routes tables.
pub struct App<'a, S: Session + ?Sized, L: LineSource, W: Write> {
    dao: GenericDao<'a, S>,
    source: L,
    out: W,
    json: bool,
}

impl<'a, S: Session + ?Sized, L: LineSource, W: Write> App<'a, S, L, W> {
    pub fn new(session: &'a S, source: L, out: W, json: bool) -> Self {
        Self {
            dao: GenericDao::new(session),
            source,
            out,
            json,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until the exit option is chosen or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{}", menu())?;
            let Some(line) = self.source.read_line("Insert function you want to use: ")? else {
                break;
            };
            writeln!(self.out, "{}", SEPARATOR)?;

            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(self.out, "Function not found.")?;
                continue;
            };
            if choice == MenuChoice::Exit {
                break;
            }

            if let Err(err) = self.dispatch(choice) {
                warn!(error = %err, "menu action failed");
                writeln!(self.out, "Error: {}", err)?;
            }
        }

        writeln!(self.out, "Closing Application . . .")?;
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Insert => {
                let table = self.ask_table("Select table name you want to insert (bus, driver, place, routes): ")?;
                for_table!(table, self.insert)
            }
            MenuChoice::UpdateRoutes => {
                let routes = Populator::new(&mut self.source).populate_all::<Routes>()?;
                let outcome = self.dao.update(&routes)?;
                self.report("Update", Routes::model_name(), &outcome)
            }
            MenuChoice::DeleteRoutes => {
                let routes = Populator::new(&mut self.source).populate_keys_only::<Routes>()?;
                let outcome = self.dao.delete(&routes)?;
                self.report("Delete", Routes::model_name(), &outcome)
            }
            MenuChoice::QueryDriver => {
                let driver = Populator::new(&mut self.source).populate_keys_only::<Driver>()?;
                let result = self.dao.select_by_key(&driver)?;
                self.show(&result)
            }
            MenuChoice::QueryRoutes => {
                let routes = Populator::new(&mut self.source).populate_keys_only::<Routes>()?;
                let result = self.dao.select_by_key(&routes)?;
                self.show(&result)
            }
            MenuChoice::DeleteAll => {
                let table = self.ask_table("Select table name you want to empty (bus, driver, place, routes): ")?;
                for_table!(table, self.delete_all)
            }
            MenuChoice::List => {
                let table = self.ask_table("Select table name you want to list (bus, driver, place, routes): ")?;
                for_table!(table, self.list)
            }
            MenuChoice::Exit => Ok(()),
        }
    }

    fn ask_table(&mut self, prompt: &str) -> Result<EntityTable> {
        let Some(line) = self.source.read_line(prompt)? else {
            anyhow::bail!("Input ended before a table name was read");
        };
        line.parse::<EntityTable>().map_err(anyhow::Error::msg)
    }

    fn insert<M: Model>(&mut self) -> Result<()> {
        let instance = Populator::new(&mut self.source).populate_all::<M>()?;
        let outcome = self.dao.insert(&instance)?;
        self.report("Insert", M::model_name(), &outcome)
    }

    fn delete_all<M: Model>(&mut self) -> Result<()> {
        let outcome = self.dao.delete_all::<M>()?;
        self.report("Delete all", M::model_name(), &outcome)
    }

    fn list<M: Model>(&mut self) -> Result<()> {
        let result = self.dao.select_all::<M>()?;
        self.show(&result)
    }

    fn report(&mut self, action: &str, model: &str, outcome: &DmlOutcome) -> Result<()> {
        match outcome {
            DmlOutcome::Applied(0) => writeln!(self.out, "{} {}: no rows matched.", action, model)?,
            DmlOutcome::Applied(count) => writeln!(
                self.out,
                "{} {} successful ({} row(s)).",
                action, model, count
            )?,
            DmlOutcome::Failed(err) => {
                writeln!(self.out, "Error during {} {}: {}", action.to_lowercase(), model, err)?
            }
        }
        Ok(())
    }

    fn show(&mut self, result: &QueryResult) -> Result<()> {
        if self.json {
            writeln!(self.out, "{}", result.to_json()?)?;
        } else {
            result.write_table(&mut self.out)?;
        }
        Ok(())
    }
}
