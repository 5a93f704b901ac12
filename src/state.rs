use crate::db::{DbPool, OrmConn};
use crate::es::EsClient;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub es: EsClient,
}
