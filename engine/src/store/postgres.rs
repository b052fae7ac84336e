use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::{NoTls, Row};
use launchpad_core::{DiscoveredToken, TokenInfo, TokenSource};
use discovery::{StoreError, TokenStore};

const TABLE: &str = "discovered_tokens";

const COLUMNS: &str = "address, name, symbol, decimals, logo_uri, created_at, liquidity, \
    volume_24h, price, price_change_24h, market_cap, source, discovered_at";

fn schema(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            address          TEXT PRIMARY KEY,
            name             TEXT NOT NULL,
            symbol           TEXT NOT NULL,
            decimals         SMALLINT NOT NULL,
            logo_uri         TEXT NOT NULL DEFAULT '',
            created_at       BIGINT NOT NULL,
            liquidity        DOUBLE PRECISION NOT NULL,
            volume_24h       DOUBLE PRECISION NOT NULL,
            price            DOUBLE PRECISION NOT NULL,
            price_change_24h DOUBLE PRECISION NOT NULL,
            market_cap       DOUBLE PRECISION NOT NULL,
            source           TEXT NOT NULL,
            discovered_at    BIGINT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS {table}_created_at ON {table} (created_at);"
    )
}

/// Token store backed by a single PostgreSQL table
pub struct PostgresTokenStore {
    pool: Pool,
    table: String,
}

fn backend<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl PostgresTokenStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Self::connect_to_table(database_url, TABLE).await
    }

    /// `table` is interpolated into SQL, so only plain identifiers are accepted
    async fn connect_to_table(database_url: &str, table: &str) -> Result<Self, StoreError> {
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StoreError::Backend(format!("invalid table name {:?}", table)));
        }

        let mut cfg = Config::new();
        cfg.url = Some(database_url.to_string());
        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls).map_err(backend)?;

        let store = Self { pool, table: table.to_string() };
        store.ensure_schema().await?;
        tracing::info!("🗄️ PostgreSQL token store ready (table {})", store.table);
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await.map_err(backend)?;
        client.batch_execute(&schema(&self.table)).await.map_err(backend)?;
        Ok(())
    }
}

fn from_row(row: &Row) -> Result<DiscoveredToken, StoreError> {
    let source: String = row.try_get("source").map_err(backend)?;
    let decimals: i16 = row.try_get("decimals").map_err(backend)?;

    let token = TokenInfo {
        address: row.try_get("address").map_err(backend)?,
        name: row.try_get("name").map_err(backend)?,
        symbol: row.try_get("symbol").map_err(backend)?,
        decimals: u8::try_from(decimals)
            .map_err(|_| StoreError::Serialization(format!("decimals out of range: {}", decimals)))?,
        logo_uri: row.try_get("logo_uri").map_err(backend)?,
        created_at: row.try_get("created_at").map_err(backend)?,
        liquidity: row.try_get("liquidity").map_err(backend)?,
        volume_24h: row.try_get("volume_24h").map_err(backend)?,
        price: row.try_get("price").map_err(backend)?,
        price_change_24h: row.try_get("price_change_24h").map_err(backend)?,
        market_cap: row.try_get("market_cap").map_err(backend)?,
        source: source.parse::<TokenSource>().map_err(StoreError::Serialization)?,
    };

    Ok(DiscoveredToken::new(token, row.try_get("discovered_at").map_err(backend)?))
}

#[async_trait::async_trait]
impl TokenStore for PostgresTokenStore {
    async fn get(&self, address: &str) -> Result<Option<DiscoveredToken>, StoreError> {
        let client = self.pool.get().await.map_err(backend)?;
        let query = format!("SELECT {} FROM {} WHERE address = $1", COLUMNS, self.table);
        let row = client.query_opt(query.as_str(), &[&address]).await.map_err(backend)?;
        row.as_ref().map(from_row).transpose()
    }

    async fn get_all(&self) -> Result<Vec<DiscoveredToken>, StoreError> {
        let client = self.pool.get().await.map_err(backend)?;
        let query = format!("SELECT {} FROM {}", COLUMNS, self.table);
        let rows = client.query(query.as_str(), &[]).await.map_err(backend)?;
        rows.iter().map(from_row).collect()
    }

    async fn set(&self, address: &str, record: DiscoveredToken) -> Result<(), StoreError> {
        let client = self.pool.get().await.map_err(backend)?;
        let t = &record.token;

        let stmt = format!(
            "INSERT INTO {} ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (address) DO UPDATE SET \
                name = EXCLUDED.name, symbol = EXCLUDED.symbol, decimals = EXCLUDED.decimals, \
                logo_uri = EXCLUDED.logo_uri, created_at = EXCLUDED.created_at, \
                liquidity = EXCLUDED.liquidity, volume_24h = EXCLUDED.volume_24h, \
                price = EXCLUDED.price, price_change_24h = EXCLUDED.price_change_24h, \
                market_cap = EXCLUDED.market_cap, source = EXCLUDED.source, \
                discovered_at = EXCLUDED.discovered_at",
            self.table, COLUMNS
        );

        client
            .execute(
                stmt.as_str(),
                &[
                    &address,
                    &t.name,
                    &t.symbol,
                    &(t.decimals as i16),
                    &t.logo_uri,
                    &t.created_at,
                    &t.liquidity,
                    &t.volume_24h,
                    &t.price,
                    &t.price_change_24h,
                    &t.market_cap,
                    &t.source.as_str(),
                    &record.discovered_at,
                ],
            )
            .await
            .map_err(backend)?;

        Ok(())
    }

    async fn latest_created_at(&self) -> Result<Option<i64>, StoreError> {
        let client = self.pool.get().await.map_err(backend)?;
        let query = format!("SELECT MAX(created_at) FROM {}", self.table);
        let row = client
            .query_one(query.as_str(), &[])
            .await
            .map_err(backend)?;
        row.try_get::<_, Option<i64>>(0).map_err(backend)
    }
}
