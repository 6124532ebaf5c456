use criterion::{black_box, criterion_group, criterion_main, Criterion};

use luggage_sql::{SQLExecutor, SQLStore, SqliteStore, Value};

const SLOTS_TABLE: &str = "CREATE TABLE bench (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner INTEGER NOT NULL,
    slot INTEGER NOT NULL,
    UNIQUE(owner, slot)
)";

fn bench_insert(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store.exec(SLOTS_TABLE, &[]).unwrap();

    let mut i = 0i64;
    c.bench_function("sqlite_insert", |b| {
        b.iter(|| {
            store
                .insert(
                    "INSERT INTO bench (owner, slot) VALUES (?1, ?2)",
                    &[Value::Integer(i / 20), Value::Integer(i % 20)],
                )
                .unwrap();
            i += 1;
        });
    });
}

fn bench_read_then_insert_tx(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store.exec(SLOTS_TABLE, &[]).unwrap();

    let mut owner = 0i64;
    c.bench_function("sqlite_tx_read_then_insert", |b| {
        b.iter(|| {
            let tx = store.begin().unwrap();
            let rows = tx
                .query(
                    "SELECT slot FROM bench WHERE owner = ?1",
                    &[Value::Integer(black_box(owner))],
                )
                .unwrap();
            tx.insert(
                "INSERT INTO bench (owner, slot) VALUES (?1, ?2)",
                &[Value::Integer(owner), Value::Integer(rows.len() as i64)],
            )
            .unwrap();
            tx.commit().unwrap();
            owner += 1;
        });
    });
}

fn bench_query_by_owner(c: &mut Criterion) {
    let store = SqliteStore::open_in_memory().unwrap();
    store.exec(SLOTS_TABLE, &[]).unwrap();

    for i in 0..10000 {
        store
            .exec(
                "INSERT INTO bench (owner, slot) VALUES (?1, ?2)",
                &[Value::Integer(i / 20), Value::Integer(i % 20)],
            )
            .unwrap();
    }

    let mut owner = 0i64;
    c.bench_function("sqlite_query_by_owner", |b| {
        b.iter(|| {
            let rows = store
                .query(
                    "SELECT slot FROM bench WHERE owner = ?1",
                    &[Value::Integer(black_box(owner % 500))],
                )
                .unwrap();
            assert_eq!(rows.len(), 20);
            owner += 1;
        });
    });
}

criterion_group!(benches, bench_insert, bench_read_then_insert_tx, bench_query_by_owner);
criterion_main!(benches);
