//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test. Each test gets its own
//! freshly migrated database inside it, because matching looks at every
//! pending ride and every active chair and tests would otherwise see each
//! other's rows.

use anyhow::{Context, Result};
use dispatch_core::kernel::{MockPaymentGateway, ServerKernel, TestDependencies};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    /// Server URL without a database name.
    server_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=dispatch_core=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=400"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let server_url = format!("postgresql://postgres:postgres@{}:{}", pg_host, pg_port);

        Ok(Self {
            server_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }

    /// Create an empty database and run migrations on it.
    async fn fresh_database(&self) -> Result<String> {
        let name = format!("dispatch_test_{}", Uuid::new_v4().simple());

        let admin = PgPool::connect(&format!("{}/postgres", self.server_url))
            .await
            .context("Failed to connect to test server")?;
        sqlx::query(&format!("CREATE DATABASE {name}"))
            .execute(&admin)
            .await
            .context("Failed to create test database")?;
        admin.close().await;

        Ok(format!("{}/{}", self.server_url, name))
    }
}

/// Test harness that manages test infrastructure.
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let kernel = ctx.kernel();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
    /// Records every charge made through kernels built by this harness.
    pub payments: MockPaymentGateway,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;
        let db_url = infra.fresh_database().await?;

        let db_pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(&db_url)
            .await
            .context("Failed to connect to test database")?;

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_pool,
            payments: MockPaymentGateway::new(),
        })
    }

    /// Kernel over this test's database with the default 1s status cache.
    pub fn kernel(&self) -> Arc<ServerKernel> {
        self.deps().into_kernel(self.db_pool.clone())
    }

    /// Kernel whose status cache effectively never expires, so any stale
    /// read in a test comes from a missing invalidation rather than timing.
    pub fn kernel_with_long_cache(&self) -> Arc<ServerKernel> {
        self.deps()
            .status_cache_ttl(Duration::from_secs(3600))
            .into_kernel(self.db_pool.clone())
    }

    /// Test dependencies wired to this harness's payment recorder.
    pub fn deps(&self) -> TestDependencies {
        TestDependencies::new().mock_payments(self.payments.clone())
    }
}
