use rusqlite::Connection;
use sqlweave::{
    compile, skip, tokenize, CompileError, CompileOptions, Compiler, NumericMode, QueryCompiler,
    Token, Value,
};

fn open_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    let ddl = compile(
        "CREATE TABLE ?# (id INTEGER PRIMARY KEY, name TEXT, score REAL, active INTEGER)",
        &[Value::from("users")],
    )
    .unwrap();
    conn.execute_batch(&ddl).unwrap();
    conn
}

/// Runs any compiler against a live connection, the way a client would.
fn execute(conn: &Connection, compiler: &impl QueryCompiler, template: &str, args: &[Value]) -> usize {
    let sql = compiler.build_query(template, args).unwrap();
    conn.execute(&sql, []).unwrap()
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

// ---------------------------------------------------------------------------
// Documented behavior
// ---------------------------------------------------------------------------

#[test]
fn skip_drops_block() {
    assert_eq!(
        compile("SELECT * FROM t {WHERE id = ?d}", &[skip()]).unwrap(),
        "SELECT * FROM t"
    );
}

#[test]
fn block_kept_without_skip() {
    assert_eq!(
        compile("SELECT * FROM t {WHERE id = ?d}", &[Value::Int(5)]).unwrap(),
        "SELECT * FROM t WHERE id = 5"
    );
}

#[test]
fn identifier_list() {
    assert_eq!(
        compile("?#", &[Value::from(vec!["a", "b"])]).unwrap(),
        "`a`, `b`"
    );
}

#[test]
fn array_expansion_list() {
    assert_eq!(compile("?a", &[Value::from(vec![1, 2, 3])]).unwrap(), "1, 2, 3");
}

#[test]
fn array_expansion_key_value() {
    assert_eq!(
        compile("?a", &[Value::assoc([("a", 1), ("b", 2)])]).unwrap(),
        "`a` = 1, `b` = 2"
    );
}

#[test]
fn generic_rejects_list() {
    let err = compile("?", &[Value::from(vec![1, 2])]).unwrap_err();
    assert!(err.is_type_error());
}

#[test]
fn update_end_to_end() {
    assert_eq!(
        compile(
            "UPDATE t SET a = ? WHERE id = ?d",
            &[Value::from("x"), Value::Int(10)]
        )
        .unwrap(),
        "UPDATE t SET a = 'x' WHERE id = 10"
    );
}

#[test]
fn compile_is_pure() {
    let template = "SELECT ?# FROM t WHERE a IN (?a) {AND b = ?f}";
    let args = [
        Value::from(vec!["x", "y"]),
        Value::from(vec![1, 2]),
        Value::Float(0.5),
    ];
    let first = compile(template, &args).unwrap();
    let second = compile(template, &args).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "SELECT `x`, `y` FROM t WHERE a IN (1, 2) AND b = 0.5");
}

#[test]
fn count_mismatch_fails_before_substitution() {
    let templates = ["SELECT ?", "?d ?f", "(?d,?d) ?#", "?a {?}"];
    for template in templates {
        let expected = tokenize(template)
            .iter()
            .filter(|t| matches!(t, Token::Placeholder(_)))
            .count();
        for n in 0..=expected + 1 {
            if n == expected {
                continue;
            }
            // Skip sentinels would fail later if validation were bypassed.
            let args = vec![skip(); n];
            let err = compile(template, &args).unwrap_err();
            assert!(err.is_validation(), "{template} with {n} args: {err}");
        }
    }
}

#[test]
fn null_propagation() {
    for template in ["?d", "?f", "?"] {
        assert_eq!(compile(template, &[Value::Null]).unwrap(), "NULL");
    }
}

#[test]
fn glued_placeholders() {
    assert_eq!(
        compile(
            "INSERT INTO t VALUES (?d,?d)",
            &[Value::Int(1), Value::Int(2)]
        )
        .unwrap(),
        "INSERT INTO t VALUES (1,2)"
    );
}

#[test]
fn literal_question_marks_pass_through() {
    assert_eq!(
        compile("SELECT '?,' AS q, ?d", &[Value::Int(1)]).unwrap(),
        "SELECT '?,' AS q, 1"
    );
}

#[test]
fn string_escaping_is_textual() {
    assert_eq!(
        compile("SELECT ?", &[Value::from(r"O'Neil\")]).unwrap(),
        r"SELECT 'O\'Neil\\'"
    );
}

#[test]
fn open_question_choices_are_errors() {
    assert_eq!(
        compile("{a {b}}", &[]).unwrap_err(),
        CompileError::NestedBlock { offset: 3 }
    );
    assert_eq!(
        compile("a = ?d", &[skip()]).unwrap_err(),
        CompileError::SkipOutsideBlock { index: 0 }
    );
}

#[test]
fn strict_numbers_option() {
    let strict = Compiler::new(CompileOptions::default().with_numeric(NumericMode::Strict));
    assert!(matches!(
        strict.compile("?d", &[Value::from("12abc")]),
        Err(CompileError::InvalidNumber { .. })
    ));
    assert_eq!(compile("?d", &[Value::from("12abc")]).unwrap(), "12");
}

#[test]
fn compiler_is_shareable_across_threads() {
    let compiler = Compiler::default();
    std::thread::scope(|s| {
        for i in 0..4i64 {
            let compiler = &compiler;
            s.spawn(move || {
                let sql = compiler.compile("SELECT ?d", &[Value::Int(i)]).unwrap();
                assert_eq!(sql, format!("SELECT {i}"));
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Downstream execution
// ---------------------------------------------------------------------------

#[test]
fn compiled_sql_runs_against_sqlite() {
    let conn = open_db();
    let compiler = Compiler::default();

    let inserted = execute(
        &conn,
        &compiler,
        "INSERT INTO ?# (?#) VALUES (?a)",
        &[
            Value::from("users"),
            Value::from(vec!["id", "name", "score", "active"]),
            Value::List(vec![
                Value::Int(1),
                Value::from("ann"),
                Value::Float(9.5),
                Value::Bool(true),
            ]),
        ],
    );
    assert_eq!(inserted, 1);

    execute(
        &conn,
        &compiler,
        "INSERT INTO users (id, name, score, active) VALUES (?d, ? , ?f, ? )",
        &[Value::Int(2), Value::from("bob"), Value::Null, Value::Bool(false)],
    );

    let updated = execute(
        &conn,
        &compiler,
        "UPDATE users SET ?a WHERE id = ?d",
        &[
            Value::assoc([("name", Value::from("bobby")), ("score", Value::Float(4.0))]),
            Value::Int(2),
        ],
    );
    assert_eq!(updated, 1);

    let name: String = conn
        .query_row("SELECT name FROM users WHERE id = 2", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "bobby");
}

#[test]
fn optional_filters_against_sqlite() {
    let conn = open_db();
    conn.execute_batch(
        "INSERT INTO users VALUES (1, 'ann', 9.5, 1);
         INSERT INTO users VALUES (2, 'bob', 3.0, 0);
         INSERT INTO users VALUES (3, 'cy', 7.0, 1);",
    )
    .unwrap();

    let template = "SELECT COUNT(*) FROM users WHERE score > ?f {AND active = ?d}";

    let all = compile(template, &[Value::Float(1.0), skip()]).unwrap();
    assert_eq!(count(&conn, &all), 3);

    let active = compile(template, &[Value::Float(1.0), Value::Bool(true)]).unwrap();
    assert_eq!(count(&conn, &active), 2);

    let in_list = compile(
        "SELECT COUNT(*) FROM users WHERE id IN (?a)",
        &[Value::from(vec![1, 3])],
    )
    .unwrap();
    assert_eq!(count(&conn, &in_list), 2);
}
