//! Data-access layer: the lazily-initialized connection pool, the stored-procedure
//! invocation contract, and the plain parameterized SQL variant.

pub mod pool;
pub mod procedure;
pub mod statement;

pub use pool::GatewayPool;
pub use procedure::{JsonMap, ParamValue, ProcedureCall, ProcedureResult};
pub use statement::InsertResult;
