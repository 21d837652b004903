//! The DAO against a scripted session double: statements are released on every exit path and
//! failures surface the way each operation promises.

use modeldao::{
    DaoError, DmlOutcome, GenericDao, Model, PreparedStatement, QueryResult, Result, Session,
    Value,
};
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Failure {
    Nothing,
    Prepare,
    Bind,
    Execute,
    Release,
    /// `prepare` reports a configuration-class error.
    Misconfigured,
    /// `bind` reports an input-class error.
    RejectedInput,
}

struct FakeSession {
    failure: Failure,
    prepared: Cell<usize>,
    released: Cell<usize>,
    bound: RefCell<Vec<(usize, Value)>>,
    last_sql: RefCell<String>,
}

impl FakeSession {
    fn new(failure: Failure) -> Self {
        Self {
            failure,
            prepared: Cell::new(0),
            released: Cell::new(0),
            bound: RefCell::new(Vec::new()),
            last_sql: RefCell::new(String::new()),
        }
    }

    fn fail(&self, at: Failure, what: &str) -> Result<()> {
        if self.failure == at {
            return Err(DaoError::ExecutionError(format!("{} failed", what)));
        }
        Ok(())
    }
}

impl Session for FakeSession {
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement + '_>> {
        self.fail(Failure::Prepare, "prepare")?;
        if self.failure == Failure::Misconfigured {
            return Err(DaoError::ConfigurationError("column map missing".into()));
        }
        self.prepared.set(self.prepared.get() + 1);
        *self.last_sql.borrow_mut() = sql.to_string();
        Ok(Box::new(FakeStatement {
            session: self,
            sql: sql.to_string(),
        }))
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        false
    }
}

struct FakeStatement<'s> {
    session: &'s FakeSession,
    sql: String,
}

impl PreparedStatement for FakeStatement<'_> {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bind(&mut self, index: usize, value: &Value) -> Result<()> {
        self.session.fail(Failure::Bind, "bind")?;
        if self.session.failure == Failure::RejectedInput {
            return Err(DaoError::InputError(format!("position {} rejected", index)));
        }
        self.session.bound.borrow_mut().push((index, value.clone()));
        Ok(())
    }

    fn execute_update(&mut self) -> Result<u64> {
        self.session.fail(Failure::Execute, "execute")?;
        Ok(1)
    }

    fn execute_query(&mut self) -> Result<QueryResult> {
        self.session.fail(Failure::Execute, "execute")?;
        Ok(QueryResult::new(
            vec!["register".into()],
            vec![vec![Value::from("B-1")]],
        ))
    }

    fn release(&mut self) -> Result<()> {
        self.session.released.set(self.session.released.get() + 1);
        self.session.fail(Failure::Release, "release")
    }
}

#[derive(Debug, Default, Model)]
struct Routes {
    #[primary_key]
    register: String,
    #[primary_key]
    #[model(column = "numDriver")]
    num_driver: i32,
    #[model(column = "dayWeek")]
    day_week: String,
}

#[derive(Debug, Default, Model)]
struct Ticket {
    code: String,
}

fn monday_route() -> Routes {
    Routes {
        register: "B-1".into(),
        num_driver: 7,
        day_week: "monday".into(),
    }
}

#[test]
fn test_update_binds_values_then_keys() {
    let session = FakeSession::new(Failure::Nothing);
    let dao = GenericDao::new(&session);

    assert_eq!(dao.update(&monday_route()).unwrap(), DmlOutcome::Applied(1));
    assert_eq!(
        *session.last_sql.borrow(),
        "UPDATE routes SET register = ?, numDriver = ?, dayWeek = ? WHERE register = ? AND numDriver = ?"
    );
    assert_eq!(
        *session.bound.borrow(),
        vec![
            (1, Value::from("B-1")),
            (2, Value::Integer(7)),
            (3, Value::from("monday")),
            (4, Value::from("B-1")),
            (5, Value::Integer(7)),
        ]
    );
    assert_eq!(session.released.get(), 1);
}

#[test]
fn test_bind_failure_releases_and_reports_sentinel() {
    let session = FakeSession::new(Failure::Bind);
    let dao = GenericDao::new(&session);

    let outcome = dao.insert(&monday_route()).unwrap();
    assert_eq!(outcome.row_count(), -1);
    assert_eq!(
        outcome.error(),
        Some(&DaoError::ExecutionError("bind failed".into()))
    );
    assert_eq!(session.prepared.get(), 1);
    assert_eq!(session.released.get(), 1);
}

#[test]
fn test_execute_failure_releases_and_reports_sentinel() {
    let session = FakeSession::new(Failure::Execute);
    let dao = GenericDao::new(&session);

    for outcome in [
        dao.insert(&monday_route()).unwrap(),
        dao.update(&monday_route()).unwrap(),
        dao.delete(&monday_route()).unwrap(),
        dao.delete_all::<Routes>().unwrap(),
    ] {
        assert_eq!(outcome.row_count(), -1);
    }
    assert_eq!(session.prepared.get(), 4);
    assert_eq!(session.released.get(), 4);
}

#[test]
fn test_prepare_failure_has_nothing_to_release() {
    let session = FakeSession::new(Failure::Prepare);
    let dao = GenericDao::new(&session);

    assert_eq!(dao.delete(&monday_route()).unwrap().row_count(), -1);
    assert_eq!(session.released.get(), 0);
}

#[test]
fn test_release_failure_does_not_change_outcome() {
    let session = FakeSession::new(Failure::Release);
    let dao = GenericDao::new(&session);

    assert_eq!(dao.insert(&monday_route()).unwrap(), DmlOutcome::Applied(1));
    assert_eq!(dao.select_all::<Routes>().unwrap().row_count(), 1);
    assert_eq!(session.released.get(), 2);
}

#[test]
fn test_query_failure_propagates_after_release() {
    let session = FakeSession::new(Failure::Execute);
    let dao = GenericDao::new(&session);

    let err = dao.select_by_key(&monday_route()).unwrap_err();
    assert_eq!(err, DaoError::ExecutionError("execute failed".into()));
    assert_eq!(session.released.get(), 1);
    assert_eq!(session.bound.borrow().len(), 2);
}

#[test]
fn test_configuration_error_never_reaches_the_session() {
    let session = FakeSession::new(Failure::Nothing);
    let dao = GenericDao::new(&session);

    assert!(dao.update(&Ticket::default()).unwrap_err().is_configuration());
    assert!(dao.select_by_key(&Ticket::default()).unwrap_err().is_configuration());
    assert_eq!(session.prepared.get(), 0);

    // Unfiltered statements do not need a key.
    assert_eq!(dao.delete_all::<Ticket>().unwrap(), DmlOutcome::Applied(1));
}

#[test]
fn test_session_configuration_error_is_returned_not_folded() {
    let session = FakeSession::new(Failure::Misconfigured);
    let dao = GenericDao::new(&session);

    assert_eq!(
        dao.insert(&monday_route()).unwrap_err(),
        DaoError::ConfigurationError("column map missing".into())
    );
    assert!(dao.delete_all::<Routes>().unwrap_err().is_configuration());
    assert_eq!(session.released.get(), 0);
}

#[test]
fn test_session_input_error_is_returned_after_release() {
    let session = FakeSession::new(Failure::RejectedInput);
    let dao = GenericDao::new(&session);

    let err = dao.update(&monday_route()).unwrap_err();
    assert_eq!(err, DaoError::InputError("position 1 rejected".into()));
    assert_eq!(session.prepared.get(), 1);
    assert_eq!(session.released.get(), 1);
}
