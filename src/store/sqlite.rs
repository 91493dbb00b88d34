use super::{RunOutcome, RunState, ScrapingRun, VendorFilter, VendorStore};
use crate::{utils, vendor::VendorRecord, Category, CollectorError, Table};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    QueryBuilder, Row, Sqlite, SqlitePool,
};
use std::{collections::HashSet, str::FromStr};

const VENDOR_COLUMNS: &str = "instagram_handle, business_name, category, subcategory, bio, \
     instagram_url, website_url, email, phone, follower_count, post_count, is_verified, \
     is_business_account, profile_image_url, city, state, created_at, updated_at";

const RUN_COLUMNS: &str = "run_id, category, location, status, profiles_discovered, \
     profiles_saved, started_at, completed_at, error_message";

pub struct VendorTable {
    name: String,
    pool: SqlitePool,
}

#[async_trait::async_trait]
impl Table for VendorTable {
    type Record<'a> = &'a VendorRecord;

    fn get_name(&self) -> &str {
        self.name.as_str()
    }

    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create(&self) -> Result<(), sqlx::Error> {
        let query = format!(
            r#"
                CREATE TABLE {0} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    instagram_handle TEXT NOT NULL,
                    business_name TEXT,
                    category TEXT NOT NULL,
                    subcategory TEXT,
                    bio TEXT NOT NULL DEFAULT '',
                    instagram_url TEXT,
                    website_url TEXT,
                    email TEXT,
                    phone TEXT,
                    follower_count INTEGER NOT NULL DEFAULT 0,
                    post_count INTEGER NOT NULL DEFAULT 0,
                    is_verified BOOLEAN NOT NULL DEFAULT 0,
                    is_business_account BOOLEAN NOT NULL DEFAULT 0,
                    profile_image_url TEXT,
                    city TEXT,
                    state TEXT,
                    created_at DATETIME NOT NULL,
                    updated_at DATETIME NOT NULL,
                    UNIQUE (instagram_handle, category)
                )
            "#,
            &self.name
        );
        sqlx::query(&query).execute(self.get_pool()).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS {0}_location ON {0} (category, state, city)",
            &self.name
        );
        sqlx::query(&index).execute(self.get_pool()).await?;
        Ok(())
    }

    async fn insert<'a>(&self, record: Self::Record<'a>) -> Result<(), sqlx::Error> {
        let mut tx = self.get_pool().begin().await?;
        let query = format!(
            r#"INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (instagram_handle, category) DO UPDATE SET
                   business_name = excluded.business_name,
                   subcategory = excluded.subcategory,
                   bio = excluded.bio,
                   instagram_url = COALESCE(excluded.instagram_url, instagram_url),
                   website_url = excluded.website_url,
                   email = excluded.email,
                   phone = excluded.phone,
                   follower_count = excluded.follower_count,
                   post_count = excluded.post_count,
                   is_verified = excluded.is_verified,
                   is_business_account = excluded.is_business_account,
                   profile_image_url = excluded.profile_image_url,
                   city = excluded.city,
                   state = excluded.state,
                   updated_at = excluded.updated_at"#,
            self.name, VENDOR_COLUMNS
        );
        sqlx::query(&query)
            .bind(&record.handle)
            .bind(&record.business_name)
            .bind(record.category.as_str())
            .bind(&record.subcategory)
            .bind(&record.bio)
            .bind(&record.instagram_url)
            .bind(&record.website_url)
            .bind(&record.email)
            .bind(&record.phone)
            .bind(record.follower_count)
            .bind(record.post_count)
            .bind(record.is_verified)
            .bind(record.is_business_account)
            .bind(&record.profile_image_url)
            .bind(&record.city)
            .bind(&record.state)
            .bind(record.created_at)
            .bind(utils::get_now())
            .execute(&mut tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

pub struct RunTable {
    name: String,
    pool: SqlitePool,
}

#[async_trait::async_trait]
impl Table for RunTable {
    type Record<'a> = &'a ScrapingRun;

    fn get_name(&self) -> &str {
        self.name.as_str()
    }

    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create(&self) -> Result<(), sqlx::Error> {
        let query = format!(
            r#"
                CREATE TABLE {} (
                    run_id TEXT PRIMARY KEY,
                    category TEXT NOT NULL,
                    location TEXT NOT NULL,
                    status TEXT NOT NULL,
                    profiles_discovered INTEGER NOT NULL DEFAULT 0,
                    profiles_saved INTEGER NOT NULL DEFAULT 0,
                    started_at DATETIME NOT NULL,
                    completed_at DATETIME,
                    error_message TEXT
                )
            "#,
            &self.name
        );
        sqlx::query(&query).execute(self.get_pool()).await?;
        Ok(())
    }

    async fn insert<'a>(&self, run: Self::Record<'a>) -> Result<(), sqlx::Error> {
        let mut tx = self.get_pool().begin().await?;
        let query = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.name, RUN_COLUMNS
        );
        sqlx::query(&query)
            .bind(&run.run_id)
            .bind(run.category.as_str())
            .bind(&run.location)
            .bind(run.state.as_str())
            .bind(run.profiles_discovered)
            .bind(run.profiles_saved)
            .bind(run.started_at)
            .bind(run.completed_at)
            .bind(&run.error_message)
            .execute(&mut tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

pub struct SqliteVendorStore {
    pub vendors: VendorTable,
    pub runs: RunTable,
    pool: SqlitePool,
}

impl SqliteVendorStore {
    /// Opens (creating if needed) the database at `url`, which may be a
    /// plain path or a `sqlite://` URL.
    pub async fn open(url: &str) -> Result<SqliteVendorStore, CollectorError> {
        let opt = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(opt).await?;
        SqliteVendorStore::with_pool(pool).await
    }

    /// A private in-memory database. The pool holds a single connection
    /// since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<SqliteVendorStore, CollectorError> {
        let opt = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await?;
        SqliteVendorStore::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<SqliteVendorStore, CollectorError> {
        let store = SqliteVendorStore {
            vendors: VendorTable {
                name: "instagram_vendors".to_string(),
                pool: pool.clone(),
            },
            runs: RunTable {
                name: "scraping_runs".to_string(),
                pool: pool.clone(),
            },
            pool,
        };
        store.vendors.ensure().await?;
        store.runs.ensure().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn select_vendors(&self, filter: &VendorFilter) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE 1 = 1",
            VENDOR_COLUMNS,
            self.vendors.get_name()
        ));
        push_filter(&mut qb, filter);
        qb
    }
}

fn push_filter(qb: &mut QueryBuilder<'static, Sqlite>, filter: &VendorFilter) {
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(city) = &filter.city {
        qb.push(" AND city = ")
            .push_bind(city.clone())
            .push(" COLLATE NOCASE");
    }
    if let Some(state) = &filter.state {
        qb.push(" AND state = ")
            .push_bind(state.clone())
            .push(" COLLATE NOCASE");
    }
}

fn vendor_from_row(row: &SqliteRow) -> Result<VendorRecord, CollectorError> {
    let category: String = row.try_get("category")?;
    Ok(VendorRecord {
        handle: row.try_get("instagram_handle")?,
        business_name: row.try_get("business_name")?,
        category: category.parse()?,
        subcategory: row.try_get("subcategory")?,
        bio: row.try_get("bio")?,
        instagram_url: row.try_get("instagram_url")?,
        website_url: row.try_get("website_url")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        follower_count: row.try_get("follower_count")?,
        post_count: row.try_get("post_count")?,
        is_verified: row.try_get("is_verified")?,
        is_business_account: row.try_get("is_business_account")?,
        profile_image_url: row.try_get("profile_image_url")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn run_from_row(row: &SqliteRow) -> Result<ScrapingRun, CollectorError> {
    let category: String = row.try_get("category")?;
    let state: String = row.try_get("status")?;
    Ok(ScrapingRun {
        run_id: row.try_get("run_id")?,
        category: category.parse()?,
        location: row.try_get("location")?,
        state: state.parse()?,
        profiles_discovered: row.try_get("profiles_discovered")?,
        profiles_saved: row.try_get("profiles_saved")?,
        started_at: row.try_get("started_at")?,
        completed_at: row.try_get("completed_at")?,
        error_message: row.try_get("error_message")?,
    })
}

#[async_trait::async_trait]
impl VendorStore for SqliteVendorStore {
    async fn upsert_vendor(&self, vendor: &VendorRecord) -> Result<(), CollectorError> {
        Ok(self.vendors.insert(vendor).await?)
    }

    async fn get_vendor(
        &self,
        handle: &str,
        category: Category,
    ) -> Result<Option<VendorRecord>, CollectorError> {
        let query = format!(
            "SELECT {} FROM {} WHERE instagram_handle = ? AND category = ?",
            VENDOR_COLUMNS,
            self.vendors.get_name()
        );
        sqlx::query(&query)
            .bind(handle)
            .bind(category.as_str())
            .fetch_optional(&self.pool)
            .await?
            .as_ref()
            .map(vendor_from_row)
            .transpose()
    }

    async fn existing_handles(&self, category: Category) -> Result<HashSet<String>, CollectorError> {
        let mut handles = HashSet::new();
        let query = format!(
            "SELECT instagram_handle FROM {} WHERE category = ?",
            self.vendors.get_name()
        );
        for row in sqlx::query(&query)
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await?
        {
            handles.insert(row.try_get("instagram_handle")?);
        }
        Ok(handles)
    }

    async fn count(&self, filter: &VendorFilter) -> Result<u32, CollectorError> {
        if *filter == VendorFilter::all() {
            return Ok(self.vendors.count().await?);
        }
        let mut qb = QueryBuilder::new(format!(
            "SELECT COUNT(*) FROM {} WHERE 1 = 1",
            self.vendors.get_name()
        ));
        push_filter(&mut qb, filter);
        Ok(qb.build().fetch_one(&self.pool).await?.try_get(0)?)
    }

    async fn find(&self, filter: &VendorFilter) -> Result<Vec<VendorRecord>, CollectorError> {
        let mut qb = self.select_vendors(filter);
        qb.push(" ORDER BY follower_count DESC, instagram_handle");
        qb.build()
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(vendor_from_row)
            .collect()
    }

    async fn delete_vendor(&self, handle: &str, category: Category) -> Result<bool, CollectorError> {
        let mut tx = self.pool.begin().await?;
        let query = format!(
            "DELETE FROM {} WHERE instagram_handle = ? AND category = ?",
            self.vendors.get_name()
        );
        let result = sqlx::query(&query)
            .bind(handle)
            .bind(category.as_str())
            .execute(&mut tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn missing_instagram_url(&self) -> Result<Vec<VendorRecord>, CollectorError> {
        let query = format!(
            "SELECT {} FROM {} WHERE instagram_url IS NULL OR TRIM(instagram_url) = '' \
             ORDER BY category, instagram_handle",
            VENDOR_COLUMNS,
            self.vendors.get_name()
        );
        sqlx::query(&query)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(vendor_from_row)
            .collect()
    }

    async fn set_instagram_url(
        &self,
        handle: &str,
        category: Category,
        url: &str,
    ) -> Result<bool, CollectorError> {
        let mut tx = self.pool.begin().await?;
        let query = format!(
            "UPDATE {} SET instagram_url = ?, updated_at = ? \
             WHERE instagram_handle = ? AND category = ?",
            self.vendors.get_name()
        );
        let result = sqlx::query(&query)
            .bind(url)
            .bind(utils::get_now())
            .bind(handle)
            .bind(category.as_str())
            .execute(&mut tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn missing_profile_image(&self, limit: u32) -> Result<Vec<VendorRecord>, CollectorError> {
        let query = format!(
            "SELECT {} FROM {} WHERE profile_image_url IS NULL OR TRIM(profile_image_url) = '' \
             ORDER BY follower_count DESC, instagram_handle LIMIT ?",
            VENDOR_COLUMNS,
            self.vendors.get_name()
        );
        sqlx::query(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(vendor_from_row)
            .collect()
    }

    async fn set_profile_image(
        &self,
        handle: &str,
        category: Category,
        url: &str,
    ) -> Result<bool, CollectorError> {
        let mut tx = self.pool.begin().await?;
        let query = format!(
            "UPDATE {} SET profile_image_url = ?, updated_at = ? \
             WHERE instagram_handle = ? AND category = ?",
            self.vendors.get_name()
        );
        let result = sqlx::query(&query)
            .bind(url)
            .bind(utils::get_now())
            .bind(handle)
            .bind(category.as_str())
            .execute(&mut tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn discovery_seeds(
        &self,
        category: Category,
        min_followers: i64,
        limit: u32,
    ) -> Result<Vec<String>, CollectorError> {
        let mut seeds = vec![];
        let query = format!(
            "SELECT instagram_handle FROM {} WHERE category = ? AND follower_count >= ? \
             ORDER BY follower_count DESC, instagram_handle LIMIT ?",
            self.vendors.get_name()
        );
        for row in sqlx::query(&query)
            .bind(category.as_str())
            .bind(min_followers)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        {
            seeds.push(row.try_get("instagram_handle")?);
        }
        Ok(seeds)
    }

    async fn record_run(&self, run: &ScrapingRun) -> Result<(), CollectorError> {
        Ok(self.runs.insert(run).await?)
    }

    async fn finish_run(&self, run_id: &str, outcome: &RunOutcome) -> Result<(), CollectorError> {
        let mut tx = self.pool.begin().await?;
        let query = format!(
            "UPDATE {} SET status = ?, profiles_discovered = ?, profiles_saved = ?, \
             completed_at = ?, error_message = ? WHERE run_id = ?",
            self.runs.get_name()
        );
        sqlx::query(&query)
            .bind(outcome.state.as_str())
            .bind(outcome.profiles_discovered)
            .bind(outcome.profiles_saved)
            .bind(utils::get_now())
            .bind(&outcome.error_message)
            .bind(run_id)
            .execute(&mut tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn recent_runs(&self, limit: u32) -> Result<Vec<ScrapingRun>, CollectorError> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY started_at DESC, run_id DESC LIMIT ?",
            RUN_COLUMNS,
            self.runs.get_name()
        );
        sqlx::query(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(run_from_row)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tokio::fs;

    macro_rules! upsert {
        ($store:expr, $($vendor:expr),+) => {
            $(
                $store.upsert_vendor(&$vendor).await.unwrap();
            )+
        };
    }

    macro_rules! assert_count {
        ($store:expr, $filter:expr, $n:expr) => {
            assert_eq!($store.count(&$filter).await.unwrap(), $n);
        };
    }

    fn vendor(handle: &str, category: Category, followers: i64, city: &str, state: &str) -> VendorRecord {
        let mut v = VendorRecord::new(handle, category).with_bio("Wedding vendor");
        v.follower_count = followers;
        v.city = Some(city.to_string());
        v.state = Some(state.to_string());
        v
    }

    #[tokio::test]
    async fn create_new_file() {
        if Path::new("test_store.db").is_file() {
            fs::remove_file("test_store.db").await.unwrap();
        }

        assert!(!Path::new("test_store.db").is_file());
        let store = SqliteVendorStore::open("sqlite://test_store.db").await.unwrap();
        assert!(Path::new("test_store.db").is_file());
        assert_eq!(store.vendors.count().await.unwrap(), 0);
        assert_eq!(store.runs.count().await.unwrap(), 0);
        upsert!(store, vendor("bloomsdallas", Category::Florists, 900, "Dallas", "TX"));
        store.pool().close().await;

        let reopened = SqliteVendorStore::open("test_store.db").await.unwrap();
        assert_count!(reopened, VendorFilter::all(), 1);
        reopened.pool().close().await;

        fs::remove_file("test_store.db").await.unwrap();
    }

    #[tokio::test]
    async fn upsert_preserves_created_at() {
        let store = SqliteVendorStore::in_memory().await.unwrap();

        let mut v = vendor("bloomsdallas", Category::Florists, 900, "Dallas", "TX");
        upsert!(store, v);
        let first = store
            .get_vendor("bloomsdallas", Category::Florists)
            .await
            .unwrap()
            .unwrap();

        v.follower_count = 1500;
        v.email = Some("hello@blooms.com".to_string());
        v.created_at = v.created_at + chrono::Duration::days(3);
        upsert!(store, v);

        let second = store
            .get_vendor("bloomsdallas", Category::Florists)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.follower_count, 1500);
        assert_eq!(second.email.as_deref(), Some("hello@blooms.com"));
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_count!(store, VendorFilter::all(), 1);
    }

    #[tokio::test]
    async fn upsert_keeps_url_when_new_one_is_missing() {
        let store = SqliteVendorStore::in_memory().await.unwrap();

        let mut v = vendor("bloomsdallas", Category::Florists, 900, "Dallas", "TX");
        upsert!(store, v);

        v.instagram_url = None;
        v.follower_count = 1200;
        upsert!(store, v);

        let stored = store
            .get_vendor("bloomsdallas", Category::Florists)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.follower_count, 1200);
        assert_eq!(
            stored.instagram_url.as_deref(),
            Some("https://www.instagram.com/bloomsdallas")
        );
        assert!(store.missing_instagram_url().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_images() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        let mut pictured = vendor("pictured", Category::Venues, 5000, "Austin", "TX");
        pictured.profile_image_url = Some("https://cdn.example/p.jpg".to_string());
        let mut blank = vendor("blank", Category::Venues, 100, "Austin", "TX");
        blank.profile_image_url = Some(" ".to_string());
        upsert!(
            store,
            pictured,
            blank,
            vendor("big", Category::Venues, 9000, "Austin", "TX"),
            vendor("small", Category::Venues, 50, "Austin", "TX")
        );

        let missing: Vec<String> = store
            .missing_profile_image(10)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.handle)
            .collect();
        assert_eq!(missing, vec!["big", "blank", "small"]);
        assert_eq!(store.missing_profile_image(1).await.unwrap().len(), 1);

        assert!(store
            .set_profile_image("big", Category::Venues, "https://cdn.example/big.jpg")
            .await
            .unwrap());
        assert!(!store
            .set_profile_image("big", Category::Florists, "https://cdn.example/big.jpg")
            .await
            .unwrap());
        assert_eq!(store.missing_profile_image(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn same_handle_in_two_categories() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        upsert!(
            store,
            vendor("studio_k", Category::Photographers, 3000, "Austin", "TX"),
            vendor("studio_k", Category::Videographers, 3000, "Austin", "TX")
        );

        assert_count!(store, VendorFilter::all(), 2);
        assert_count!(store, VendorFilter::category(Category::Photographers), 1);
        assert!(store
            .existing_handles(Category::Videographers)
            .await
            .unwrap()
            .contains("studio_k"));
        assert!(store
            .existing_handles(Category::Florists)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn filters_and_ordering() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        upsert!(
            store,
            vendor("a_florals", Category::Florists, 700, "Dallas", "TX"),
            vendor("b_florals", Category::Florists, 5200, "Dallas", "TX"),
            vendor("c_florals", Category::Florists, 2100, "Houston", "TX"),
            vendor("d_venue", Category::Venues, 9000, "Dallas", "TX")
        );

        assert_count!(
            store,
            VendorFilter::category(Category::Florists).in_city("dallas", "tx"),
            2
        );
        assert_count!(
            store,
            VendorFilter {
                state: Some("TX".into()),
                ..Default::default()
            },
            4
        );

        let handles: Vec<String> = store
            .find(&VendorFilter::category(Category::Florists))
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.handle)
            .collect();
        assert_eq!(handles, vec!["b_florals", "c_florals", "a_florals"]);

        assert_eq!(
            store
                .discovery_seeds(Category::Florists, 1000, 5)
                .await
                .unwrap(),
            vec!["b_florals".to_string(), "c_florals".to_string()]
        );
    }

    #[tokio::test]
    async fn delete_and_fix_urls() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        let mut v = vendor("lacebridal", Category::BridalShops, 1200, "Chicago", "IL");
        v.instagram_url = None;
        upsert!(store, v);

        let missing = store.missing_instagram_url().await.unwrap();
        assert_eq!(missing.len(), 1);
        assert!(store
            .set_instagram_url(
                "lacebridal",
                Category::BridalShops,
                "https://www.instagram.com/lacebridal"
            )
            .await
            .unwrap());
        assert!(store.missing_instagram_url().await.unwrap().is_empty());

        assert!(store
            .delete_vendor("lacebridal", Category::BridalShops)
            .await
            .unwrap());
        assert!(!store
            .delete_vendor("lacebridal", Category::BridalShops)
            .await
            .unwrap());
        assert_count!(store, VendorFilter::all(), 0);
    }

    #[tokio::test]
    async fn records_and_finishes_runs() {
        let store = SqliteVendorStore::in_memory().await.unwrap();
        let run = ScrapingRun::started("run-1", Category::Caterers, "Phoenix, AZ");
        store.record_run(&run).await.unwrap();
        assert_eq!(store.runs.count().await.unwrap(), 1);

        store
            .finish_run(
                "run-1",
                &RunOutcome {
                    state: RunState::Completed,
                    profiles_discovered: 40,
                    profiles_saved: 6,
                    error_message: None,
                },
            )
            .await
            .unwrap();

        let runs = store.recent_runs(10).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].state, RunState::Completed);
        assert_eq!(runs[0].profiles_saved, 6);
        assert_eq!(runs[0].started_at, run.started_at);
        assert!(runs[0].completed_at.is_some());
    }
}
