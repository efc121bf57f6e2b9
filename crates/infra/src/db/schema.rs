//! Table definitions, applied on every startup.

pub(crate) const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS vendors (
        id            TEXT PRIMARY KEY,
        name          TEXT NOT NULL,
        email         TEXT NOT NULL,
        phone         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        location      TEXT NOT NULL DEFAULT '',
        approved      INTEGER NOT NULL DEFAULT 0,
        created_at    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS wholesalers (
        id               TEXT PRIMARY KEY,
        name             TEXT NOT NULL,
        phone            TEXT NOT NULL UNIQUE,
        password_hash    TEXT NOT NULL,
        shop_name        TEXT NOT NULL,
        sourcing_info    TEXT NOT NULL DEFAULT '',
        location         TEXT NOT NULL DEFAULT '',
        id_doc_path      TEXT NULL,
        license_doc_path TEXT NULL,
        profile_photo    TEXT NULL,
        approved         INTEGER NOT NULL DEFAULT 0,
        trust_score      REAL NOT NULL DEFAULT 4.7,
        response_rate    REAL NOT NULL DEFAULT 95.0,
        delivery_rate    REAL NOT NULL DEFAULT 92.0,
        created_at       TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id                 TEXT PRIMARY KEY,
        wholesaler_id      TEXT NOT NULL REFERENCES wholesalers (id),
        name               TEXT NOT NULL,
        category           TEXT NULL,
        price              INTEGER NOT NULL,
        stock              INTEGER NOT NULL,
        status             TEXT NOT NULL,
        group_buy_eligible INTEGER NOT NULL DEFAULT 1,
        image_path         TEXT NULL,
        views              INTEGER NOT NULL DEFAULT 0,
        likes              INTEGER NOT NULL DEFAULT 0,
        created_at         TEXT NOT NULL
    )
    "#,
    // product_id is not a foreign key: deleting a product keeps its order history.
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id            TEXT PRIMARY KEY,
        wholesaler_id TEXT NOT NULL REFERENCES wholesalers (id),
        vendor_id     TEXT NOT NULL REFERENCES vendors (id),
        product_id    TEXT NOT NULL,
        quantity      INTEGER NOT NULL,
        total_amount  INTEGER NOT NULL,
        status        TEXT NOT NULL DEFAULT 'pending',
        created_at    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id            TEXT PRIMARY KEY,
        wholesaler_id TEXT NOT NULL REFERENCES wholesalers (id),
        vendor_id     TEXT NOT NULL REFERENCES vendors (id),
        rating        INTEGER NOT NULL,
        comment       TEXT NOT NULL DEFAULT '',
        reply         TEXT NULL,
        created_at    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS analytics (
        wholesaler_id    TEXT NOT NULL REFERENCES wholesalers (id),
        date             TEXT NOT NULL,
        total_orders     INTEGER NOT NULL DEFAULT 0,
        total_revenue    INTEGER NOT NULL DEFAULT 0,
        active_customers INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (wholesaler_id, date)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_products_wholesaler ON products (wholesaler_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_orders_wholesaler ON orders (wholesaler_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_orders_vendor ON orders (vendor_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_wholesaler ON reviews (wholesaler_id, created_at)",
];
