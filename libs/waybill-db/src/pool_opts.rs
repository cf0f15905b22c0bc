use crate::ConnectOpts;

/// Apply [`ConnectOpts`] to an engine-specific sqlx pool builder.
pub trait ApplyPoolOpts {
    #[must_use]
    fn apply(self, opts: &ConnectOpts) -> Self;
}

macro_rules! impl_apply_pool_opts {
    ($ty:ty) => {
        impl ApplyPoolOpts for $ty {
            fn apply(mut self, opts: &ConnectOpts) -> Self {
                if let Some(n) = opts.max_conns {
                    self = self.max_connections(n);
                }
                if let Some(n) = opts.min_conns {
                    self = self.min_connections(n);
                }
                if let Some(t) = opts.acquire_timeout {
                    self = self.acquire_timeout(t);
                }
                self = self.idle_timeout(opts.idle_timeout);
                self = self.max_lifetime(opts.max_lifetime);
                self.test_before_acquire(opts.test_before_acquire)
            }
        }
    };
}

#[cfg(feature = "pg")]
impl_apply_pool_opts!(sqlx::postgres::PgPoolOptions);

#[cfg(feature = "mysql")]
impl_apply_pool_opts!(sqlx::mysql::MySqlPoolOptions);

#[cfg(feature = "sqlite")]
impl_apply_pool_opts!(sqlx::sqlite::SqlitePoolOptions);
