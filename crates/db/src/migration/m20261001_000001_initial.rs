//! Initial database migration.
//!
//! Creates the society tables, enums, uniqueness guards and RLS policies.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & SOCIETIES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(SOCIETIES_SQL).await?;

        // ============================================================
        // PART 3: UNITS & MEMBERS
        // ============================================================
        db.execute_unprepared(UNITS_SQL).await?;
        db.execute_unprepared(MEMBERS_SQL).await?;

        // ============================================================
        // PART 4: DUES, ALLOCATIONS & PENALTIES
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(DUES_SQL).await?;
        db.execute_unprepared(PENALTIES_SQL).await?;

        // ============================================================
        // PART 5: LEDGER, POLLS & NOTICES
        // ============================================================
        db.execute_unprepared(LEDGER_SQL).await?;
        db.execute_unprepared(POLLS_SQL).await?;
        db.execute_unprepared(NOTICES_SQL).await?;

        // ============================================================
        // PART 6: ROW-LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE society_type AS ENUM ('housing', 'residential', 'commercial');
CREATE TYPE society_role AS ENUM ('super_admin', 'admin', 'member');
CREATE TYPE allocation_mode AS ENUM ('settlement', 'quarterly', 'halfyearly', 'yearly');
CREATE TYPE ledger_kind AS ENUM ('expense', 'income');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id              UUID PRIMARY KEY,
    email           VARCHAR(255) NOT NULL UNIQUE,
    password_hash   VARCHAR(255) NOT NULL,
    full_name       VARCHAR(255) NOT NULL,
    phone           VARCHAR(32),
    is_active       BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const SOCIETIES_SQL: &str = r"
CREATE TABLE societies (
    id              UUID PRIMARY KEY,
    name            VARCHAR(255) NOT NULL,
    society_type    society_type NOT NULL,
    address_line    VARCHAR(500) NOT NULL,
    city            VARCHAR(100) NOT NULL,
    state           VARCHAR(100) NOT NULL,
    pincode         VARCHAR(16) NOT NULL,
    opening_balance NUMERIC(19, 0) NOT NULL DEFAULT 0,
    created_by      UUID NOT NULL REFERENCES users(id),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE society_users (
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    user_id         UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role            society_role NOT NULL DEFAULT 'member',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (society_id, user_id)
);

CREATE INDEX idx_society_users_user ON society_users(user_id);
";

const UNITS_SQL: &str = r"
CREATE TABLE buildings (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    name            VARCHAR(255) NOT NULL,
    total_floors    INTEGER NOT NULL CHECK (total_floors >= 0),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (society_id, name)
);

CREATE TABLE flats (
    id                  UUID PRIMARY KEY,
    society_id          UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    building_id         UUID NOT NULL REFERENCES buildings(id) ON DELETE CASCADE,
    flat_number         VARCHAR(32) NOT NULL,
    floor_number        INTEGER NOT NULL,
    square_foot         INTEGER NOT NULL CHECK (square_foot >= 0),
    current_maintenance NUMERIC(19, 0) NOT NULL DEFAULT 0 CHECK (current_maintenance >= 0),
    is_occupied         BOOLEAN NOT NULL DEFAULT FALSE,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (building_id, flat_number)
);

CREATE INDEX idx_flats_society_occupied ON flats(society_id) WHERE is_occupied;

CREATE TABLE housing_units (
    id                  UUID PRIMARY KEY,
    society_id          UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    unit_number         VARCHAR(32) NOT NULL,
    unit_type           VARCHAR(64) NOT NULL,
    square_foot         INTEGER NOT NULL CHECK (square_foot >= 0),
    current_maintenance NUMERIC(19, 0) NOT NULL DEFAULT 0 CHECK (current_maintenance >= 0),
    is_occupied         BOOLEAN NOT NULL DEFAULT FALSE,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (society_id, unit_number)
);

CREATE INDEX idx_housing_units_society_occupied ON housing_units(society_id) WHERE is_occupied;
";

const MEMBERS_SQL: &str = r"
CREATE TABLE members (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    user_id         UUID NOT NULL REFERENCES users(id),
    building_id     UUID REFERENCES buildings(id),
    flat_id         UUID REFERENCES flats(id),
    housing_id      UUID REFERENCES housing_units(id),
    move_in_date    DATE NOT NULL,
    moved_out_at    TIMESTAMPTZ,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_member_unit CHECK (
        (flat_id IS NOT NULL AND building_id IS NOT NULL AND housing_id IS NULL)
        OR (flat_id IS NULL AND building_id IS NULL AND housing_id IS NOT NULL)
    )
);

CREATE UNIQUE INDEX uq_members_active_user ON members(society_id, user_id)
    WHERE moved_out_at IS NULL;
CREATE INDEX idx_members_flat ON members(flat_id) WHERE moved_out_at IS NULL;
CREATE INDEX idx_members_housing ON members(housing_id) WHERE moved_out_at IS NULL;
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id                  UUID PRIMARY KEY,
    society_id          UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    gateway_payment_id  VARCHAR(128) NOT NULL UNIQUE,
    gateway_order_id    VARCHAR(128) NOT NULL,
    method              VARCHAR(64),
    amount              NUMERIC(19, 0) NOT NULL CHECK (amount >= 0),
    fee                 NUMERIC(19, 0) NOT NULL DEFAULT 0 CHECK (fee >= 0),
    tax                 NUMERIC(19, 0) NOT NULL DEFAULT 0 CHECK (tax >= 0),
    confirmed_by        UUID NOT NULL REFERENCES users(id),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DUES_SQL: &str = r"
CREATE TABLE monthly_maintenance_dues (
    id                  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id          UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    building_id         UUID REFERENCES buildings(id),
    flat_id             UUID REFERENCES flats(id),
    housing_id          UUID REFERENCES housing_units(id),
    member_ids          UUID[] NOT NULL CHECK (cardinality(member_ids) > 0),
    month_year          DATE NOT NULL CHECK (EXTRACT(DAY FROM month_year) = 1),
    maintenance_amount  NUMERIC(19, 0) NOT NULL CHECK (maintenance_amount >= 0),
    maintenance_paid    BOOLEAN NOT NULL DEFAULT FALSE,
    maintenance_paid_at TIMESTAMPTZ,
    payment_id          UUID REFERENCES payments(id),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_due_unit CHECK (
        (flat_id IS NOT NULL AND building_id IS NOT NULL AND housing_id IS NULL)
        OR (flat_id IS NULL AND building_id IS NULL AND housing_id IS NOT NULL)
    )
);

-- One due per unit and month
CREATE UNIQUE INDEX uq_dues_flat_month ON monthly_maintenance_dues(flat_id, month_year)
    WHERE flat_id IS NOT NULL;
CREATE UNIQUE INDEX uq_dues_housing_month ON monthly_maintenance_dues(housing_id, month_year)
    WHERE housing_id IS NOT NULL;
CREATE INDEX idx_dues_society_month ON monthly_maintenance_dues(society_id, month_year);

CREATE TABLE pending_maintenances (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    due_id          UUID NOT NULL UNIQUE REFERENCES monthly_maintenance_dues(id),
    amount          NUMERIC(19, 0) NOT NULL CHECK (amount > 0),
    mode            allocation_mode NOT NULL,
    created_by      UUID NOT NULL REFERENCES users(id),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE maintenance_allocations (
    id                      UUID PRIMARY KEY,
    society_id              UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    pending_maintenance_id  UUID NOT NULL REFERENCES pending_maintenances(id) ON DELETE CASCADE,
    month_year              DATE NOT NULL CHECK (EXTRACT(DAY FROM month_year) = 1),
    -- Default splits of amounts smaller than the month count carry zero shares
    amount                  NUMERIC(19, 0) NOT NULL CHECK (amount >= 0),
    is_paid                 BOOLEAN NOT NULL DEFAULT FALSE,
    paid_at                 TIMESTAMPTZ,
    payment_id              UUID REFERENCES payments(id),
    created_at              TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (pending_maintenance_id, month_year)
);
";

const PENALTIES_SQL: &str = r"
CREATE TABLE penalties (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    building_id     UUID REFERENCES buildings(id),
    flat_id         UUID REFERENCES flats(id),
    housing_id      UUID REFERENCES housing_units(id),
    amount          NUMERIC(19, 0) NOT NULL CHECK (amount > 0),
    reason          TEXT NOT NULL,
    is_paid         BOOLEAN NOT NULL DEFAULT FALSE,
    paid_at         TIMESTAMPTZ,
    is_deleted      BOOLEAN NOT NULL DEFAULT FALSE,
    deleted_at      TIMESTAMPTZ,
    deleted_by      UUID REFERENCES users(id),
    action_by       UUID NOT NULL REFERENCES users(id),
    payment_id      UUID REFERENCES payments(id),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_penalty_unit CHECK (
        (flat_id IS NOT NULL AND building_id IS NOT NULL AND housing_id IS NULL)
        OR (flat_id IS NULL AND building_id IS NULL AND housing_id IS NOT NULL)
    ),
    CONSTRAINT chk_penalty_deleted CHECK (
        NOT is_deleted OR (deleted_at IS NOT NULL AND deleted_by IS NOT NULL)
    )
);

CREATE INDEX idx_penalties_society_active ON penalties(society_id) WHERE NOT is_deleted;
";

const LEDGER_SQL: &str = r"
CREATE TABLE ledger_entries (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    kind            ledger_kind NOT NULL,
    entry_type      VARCHAR(100) NOT NULL,
    reason          TEXT,
    amount          NUMERIC(19, 0) NOT NULL CHECK (amount > 0),
    month           INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year            INTEGER NOT NULL,
    created_by      UUID NOT NULL REFERENCES users(id),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_ledger_entries_society_kind ON ledger_entries(society_id, kind, year, month);
";

const POLLS_SQL: &str = r"
CREATE TABLE polls (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    question        TEXT NOT NULL,
    description     TEXT,
    is_active       BOOLEAN NOT NULL DEFAULT TRUE,
    expires_at      TIMESTAMPTZ NOT NULL,
    created_by      UUID NOT NULL REFERENCES users(id),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE poll_options (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    poll_id         UUID NOT NULL REFERENCES polls(id) ON DELETE CASCADE,
    label           VARCHAR(255) NOT NULL,
    position        INTEGER NOT NULL,
    UNIQUE (poll_id, position)
);

CREATE TABLE poll_votes (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    poll_id         UUID NOT NULL REFERENCES polls(id) ON DELETE CASCADE,
    option_id       UUID NOT NULL REFERENCES poll_options(id) ON DELETE CASCADE,
    user_id         UUID NOT NULL REFERENCES users(id),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_poll_votes_user UNIQUE (poll_id, user_id)
);
";

const NOTICES_SQL: &str = r"
CREATE TABLE notices (
    id              UUID PRIMARY KEY,
    society_id      UUID NOT NULL REFERENCES societies(id) ON DELETE CASCADE,
    title           VARCHAR(200) NOT NULL,
    body            TEXT NOT NULL,
    expires_at      TIMESTAMPTZ,
    created_by      UUID NOT NULL REFERENCES users(id),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_notices_society ON notices(society_id, created_at DESC);
";

const RLS_SQL: &str = r"
-- Application sets context inside each tenant transaction:
-- SET LOCAL app.current_society_id = 'society-uuid';

ALTER TABLE buildings ENABLE ROW LEVEL SECURITY;
ALTER TABLE flats ENABLE ROW LEVEL SECURITY;
ALTER TABLE housing_units ENABLE ROW LEVEL SECURITY;
ALTER TABLE members ENABLE ROW LEVEL SECURITY;
ALTER TABLE monthly_maintenance_dues ENABLE ROW LEVEL SECURITY;
ALTER TABLE pending_maintenances ENABLE ROW LEVEL SECURITY;
ALTER TABLE maintenance_allocations ENABLE ROW LEVEL SECURITY;
ALTER TABLE penalties ENABLE ROW LEVEL SECURITY;
ALTER TABLE ledger_entries ENABLE ROW LEVEL SECURITY;
ALTER TABLE polls ENABLE ROW LEVEL SECURITY;
ALTER TABLE poll_options ENABLE ROW LEVEL SECURITY;
ALTER TABLE poll_votes ENABLE ROW LEVEL SECURITY;
ALTER TABLE notices ENABLE ROW LEVEL SECURITY;
ALTER TABLE payments ENABLE ROW LEVEL SECURITY;

CREATE POLICY tenant_isolation ON buildings
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON flats
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON housing_units
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON members
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON monthly_maintenance_dues
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON pending_maintenances
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON maintenance_allocations
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON penalties
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON ledger_entries
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON polls
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON poll_options
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON poll_votes
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON notices
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
CREATE POLICY tenant_isolation ON payments
    USING (society_id = current_setting('app.current_society_id', true)::UUID);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS notices CASCADE;
DROP TABLE IF EXISTS poll_votes CASCADE;
DROP TABLE IF EXISTS poll_options CASCADE;
DROP TABLE IF EXISTS polls CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS penalties CASCADE;
DROP TABLE IF EXISTS maintenance_allocations CASCADE;
DROP TABLE IF EXISTS pending_maintenances CASCADE;
DROP TABLE IF EXISTS monthly_maintenance_dues CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS members CASCADE;
DROP TABLE IF EXISTS housing_units CASCADE;
DROP TABLE IF EXISTS flats CASCADE;
DROP TABLE IF EXISTS buildings CASCADE;
DROP TABLE IF EXISTS society_users CASCADE;
DROP TABLE IF EXISTS societies CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TYPE IF EXISTS ledger_kind;
DROP TYPE IF EXISTS allocation_mode;
DROP TYPE IF EXISTS society_role;
DROP TYPE IF EXISTS society_type;
";
