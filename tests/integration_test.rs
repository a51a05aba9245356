use anyhow::Result;
use dialog::access::{ColumnType, Numeric, NumericKind, RecordBuilder};
use dialog::aggregate::{AggregateKind, ColumnAggregates, VersionedAggregate};
use dialog::catalog::{IndexId, SchemaBuilder, SchemaSnapshot};
use dialog::expression::{
    parse, Expression, ExpressionEvaluator, ParseError, RelOp, MAX_NESTING_DEPTH,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;

fn create_schema() -> SchemaSnapshot {
    SchemaBuilder::new()
        .indexed_column("a", ColumnType::Int, IndexId(1), 5)
        .indexed_column("b", ColumnType::Long, IndexId(2), 100)
        .indexed_column("c", ColumnType::Double, IndexId(3), 2)
        .column("ok", ColumnType::Bool)
        .column("name", ColumnType::String(6))
        .build()
        .unwrap()
}

const NAMES: [&str; 4] = ["ann", "bob", "carl", "dora"];

fn random_record(rng: &mut StdRng, schema: &SchemaSnapshot) -> Result<Vec<u8>> {
    let mut builder = RecordBuilder::new(schema);
    builder
        .set_timestamp(rng.gen_range(0i64..1_000_000))
        .set_numeric(0, Numeric::Int(rng.gen_range(-10i32..10)))?
        .set_numeric(1, Numeric::Long(rng.gen_range(-500i64..500)))?
        .set_numeric(2, Numeric::Double(rng.gen_range(-20i32..20) as f64 / 4.0))?
        .set(3, if rng.gen_bool(0.5) { "true" } else { "false" })?
        .set(4, NAMES[rng.gen_range(0..NAMES.len())])?;
    Ok(builder.build())
}

fn random_predicate(rng: &mut StdRng) -> Expression {
    let op = RelOp::ALL[rng.gen_range(0..RelOp::ALL.len())];
    match rng.gen_range(0..5) {
        0 => Expression::predicate("a", op, rng.gen_range(-10i32..10).to_string()),
        1 => Expression::predicate("b", op, rng.gen_range(-500i64..500).to_string()),
        2 => Expression::predicate("c", op, format!("{}", rng.gen_range(-20i32..20) as f64 / 4.0)),
        3 => Expression::predicate("ok", op, if rng.gen_bool(0.5) { "true" } else { "false" }),
        _ => Expression::predicate("name", op, NAMES[rng.gen_range(0..NAMES.len())]),
    }
}

/// Hand-built tree that may contain `Negation` nodes anywhere
fn random_tree(rng: &mut StdRng, depth: u32) -> Expression {
    if depth == 0 {
        return random_predicate(rng);
    }
    match rng.gen_range(0..4) {
        0 => random_predicate(rng),
        1 => Expression::and(random_tree(rng, depth - 1), random_tree(rng, depth - 1)),
        2 => Expression::or(random_tree(rng, depth - 1), random_tree(rng, depth - 1)),
        _ => Expression::negation(random_tree(rng, depth - 1)),
    }
}

#[test]
fn test_parsed_filters_match_unnormalized_trees() -> Result<()> {
    let schema = create_schema();
    let evaluator = ExpressionEvaluator::new(&schema);
    let mut rng = StdRng::seed_from_u64(42);
    let records: Vec<_> = (0..64)
        .map(|_| random_record(&mut rng, &schema))
        .collect::<Result<_>>()?;

    for _ in 0..200 {
        let tree = random_tree(&mut rng, 4);
        let text = tree.to_string();
        let parsed = parse(&text)?;
        assert!(parsed.is_negation_normal(), "{} -> {}", text, parsed);
        evaluator.validate(&parsed)?;

        let negated = parse(&format!("!({})", text))?;
        let doubled = parse(&format!("!!({})", text))?;
        assert_eq!(doubled, parsed);

        for record in &records {
            let expected = evaluator.evaluate(&tree, record)?;
            assert_eq!(evaluator.evaluate(&parsed, record)?, expected, "{}", text);
            assert_eq!(evaluator.evaluate(&negated, record)?, !expected, "!({})", text);
        }
    }
    Ok(())
}

#[test]
fn test_display_reparses_to_same_tree() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let parsed = parse(&random_tree(&mut rng, 5).to_string())?;
        let reparsed: Expression = parsed.to_string().parse()?;
        assert_eq!(reparsed, parsed);
    }
    Ok(())
}

#[test]
fn test_precedence_against_records() -> Result<()> {
    let schema = create_schema();
    let evaluator = ExpressionEvaluator::new(&schema);
    let mut rng = StdRng::seed_from_u64(1234);

    let implicit = parse("a>0 || b<0 && ok==true")?;
    let explicit = parse("a>0 || (b<0 && ok==true)")?;
    let wrong = parse("(a>0 || b<0) && ok==true")?;
    assert_eq!(implicit, explicit);

    let mut differs = false;
    for _ in 0..256 {
        let record = random_record(&mut rng, &schema)?;
        let expected = evaluator.evaluate(&explicit, &record)?;
        assert_eq!(evaluator.evaluate(&implicit, &record)?, expected);
        differs |= evaluator.evaluate(&wrong, &record)? != expected;
    }
    assert!(differs);
    Ok(())
}

#[test]
fn test_de_morgan_shapes() -> Result<()> {
    assert_eq!(
        parse("!(a==1 && b<2)")?,
        Expression::or(
            Expression::predicate("a", RelOp::Neq, "1"),
            Expression::predicate("b", RelOp::Ge, "2"),
        )
    );
    assert_eq!(
        parse("!(a>1 || !(c<=2))")?,
        Expression::and(
            Expression::predicate("a", RelOp::Le, "1"),
            Expression::predicate("c", RelOp::Le, "2"),
        )
    );
    assert!(matches!(parse("name !in bob"), Err(ParseError::UnsupportedOperator { .. })));
    Ok(())
}

#[test]
fn test_filter_over_raw_records() -> Result<()> {
    let schema = create_schema();
    let mut builder = RecordBuilder::new(&schema);
    builder
        .set(0, "3")?
        .set(1, "-250")?
        .set(2, "1.5")?
        .set(3, "true")?
        .set(4, "bob")?;
    let record = builder.build();

    let evaluator = ExpressionEvaluator::new(&schema);
    let cases = [
        ("a==3 && name==bob", true),
        ("!(a==3) || c>1.5", false),
        ("b<-200 && (ok==false || c>=1.5)", true),
        ("!(name<carl && name>ann)", false),
        ("!!ok==true", true),
    ];
    for (filter, expected) in cases {
        assert_eq!(evaluator.evaluate(&parse(filter)?, &record)?, expected, "{}", filter);
    }

    let bad_literal = parse("a==abc")?;
    assert!(evaluator.validate(&bad_literal).is_err());
    assert!(evaluator.evaluate(&bad_literal, &record).is_err());
    assert!(evaluator.validate(&parse("missing==1")?).is_err());
    Ok(())
}

#[test]
fn test_get_key_respects_buckets() -> Result<()> {
    let schema = create_schema();
    let mut rng = StdRng::seed_from_u64(99);

    let mut entries = Vec::new();
    for _ in 0..200 {
        let record = random_record(&mut rng, &schema)?;
        let b = schema.get(&record, 1).to_numeric().unwrap().as_i64();
        entries.push((b, schema.get_key(&record, 1)));
    }

    for (x, kx) in &entries {
        for (y, ky) in &entries {
            let (bx, by) = (x.div_euclid(100), y.div_euclid(100));
            assert_eq!(kx.cmp(ky), bx.cmp(&by), "{} vs {}", x, y);
        }
    }

    // Doubles bucket by floor(value / 2), with -0.0 and 0.0 colliding
    let key_of = |v: f64| -> Result<Vec<u8>> {
        let mut builder = RecordBuilder::new(&schema);
        builder.set_numeric(2, Numeric::Double(v))?;
        Ok(schema.get_key(&builder.build(), 2))
    };
    assert_eq!(key_of(-0.0)?, key_of(0.0)?);
    assert_eq!(key_of(0.0)?, key_of(1.9)?);
    assert_eq!(key_of(-0.5)?, key_of(-2.0)?);
    assert!(key_of(-2.5)? < key_of(-2.0)?);
    assert!(key_of(-0.5)? < key_of(0.0)?);
    assert!(key_of(1.9)? < key_of(2.0)?);
    Ok(())
}

#[test]
fn test_aggregate_scenarios() {
    let sum = VersionedAggregate::new(NumericKind::Int, AggregateKind::Sum);
    for (delta, version) in [(5, 1), (3, 4), (-2, 9)] {
        sum.update(Numeric::Int(delta), version);
    }
    let expected = [(0, 0), (1, 5), (3, 5), (4, 8), (8, 8), (9, 6), (1000, 6)];
    for (version, value) in expected {
        assert_eq!(sum.get(version), Numeric::Int(value), "sum at {}", version);
    }

    let min = VersionedAggregate::new(NumericKind::Double, AggregateKind::Min);
    assert_eq!(min.get(0), Numeric::Double(f64::MAX));
    min.update(Numeric::Double(2.5), 10);
    min.update(Numeric::Double(7.0), 20);
    min.update(Numeric::Double(-1.0), 30);
    assert_eq!(min.get(9), Numeric::Double(f64::MAX));
    assert_eq!(min.get(25), Numeric::Double(2.5));
    assert_eq!(min.get(30), Numeric::Double(-1.0));

    let max = VersionedAggregate::new(NumericKind::Short, AggregateKind::Max);
    max.update(Numeric::Short(4), 2);
    max.update(Numeric::Short(1), 3);
    assert_eq!(max.get(1), Numeric::Short(i16::MIN));
    assert_eq!(max.get(3), Numeric::Short(4));
}

#[test]
fn test_column_aggregates_over_log_positions() -> Result<()> {
    let schema = create_schema();
    let mut aggregates = ColumnAggregates::new(schema.clone());
    let sum_a = aggregates.add(0, AggregateKind::Sum)?;
    let max_c = aggregates.add(2, AggregateKind::Max)?;
    let count = aggregates.add(0, AggregateKind::Count)?;
    assert!(aggregates.add(4, AggregateKind::Min).is_err());

    let mut rng = StdRng::seed_from_u64(5);
    let mut position = 0u64;
    let mut history = Vec::new();
    let (mut running_sum, mut running_max) = (0i32, f64::MIN);

    for n in 1..=50i64 {
        let record = random_record(&mut rng, &schema)?;
        position += record.len() as u64;
        aggregates.append(&record, position);

        running_sum += schema.get(&record, 0).to_numeric().unwrap().as_i64() as i32;
        running_max = running_max.max(schema.get(&record, 2).to_numeric().unwrap().as_f64());
        history.push((position, running_sum, running_max, n));
    }

    for (position, sum, max, n) in history {
        assert_eq!(aggregates.get(sum_a, position), Numeric::Int(sum));
        assert_eq!(aggregates.get(sum_a, position + 1), Numeric::Int(sum));
        assert_eq!(aggregates.get(max_c, position), Numeric::Double(max));
        assert_eq!(aggregates.get(count, position), Numeric::Long(n));
    }
    assert_eq!(aggregates.get(count, 0), Numeric::Long(0));
    Ok(())
}

#[test]
fn test_concurrent_readers_during_appends() {
    let aggregate = Arc::new(VersionedAggregate::new(NumericKind::Long, AggregateKind::Count));
    let mut handles = vec![];

    for _ in 0..4 {
        let aggregate = Arc::clone(&aggregate);
        handles.push(thread::spawn(move || {
            let mut seen = 0i64;
            while seen < 500 {
                // Version v always reads v / 3 once published
                let last = aggregate.last_version();
                let value = aggregate.get(last).as_i64();
                assert_eq!(value, (last / 3) as i64);
                assert!(value >= seen);
                seen = value;
            }
        }));
    }

    for n in 1..=500u64 {
        aggregate.update(Numeric::Long(1), n * 3);
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(aggregate.num_entries(), 501);
}

#[test]
fn test_shared_evaluator_across_threads() -> Result<()> {
    let schema = create_schema();
    let evaluator = ExpressionEvaluator::new(&schema);
    let mut rng = StdRng::seed_from_u64(2024);
    let filter = parse(&random_tree(&mut rng, 6).to_string())?;
    let records: Vec<_> = (0..400)
        .map(|_| random_record(&mut rng, &schema))
        .collect::<Result<_>>()?;

    let expected = records
        .iter()
        .map(|record| evaluator.evaluate(&filter, record))
        .collect::<Result<Vec<_>, _>>()?;

    thread::scope(|s| {
        let handles: Vec<_> = records
            .chunks(50)
            .map(|chunk| {
                let (evaluator, filter) = (&evaluator, &filter);
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|record| evaluator.evaluate(filter, record).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<bool> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(results, expected, "{}", filter);
    });
    Ok(())
}

#[test]
fn test_long_filters_parse_and_evaluate() -> Result<()> {
    let schema = create_schema();
    let mut builder = RecordBuilder::new(&schema);
    builder.set(0, "3")?.set(4, "bob")?;
    let record = builder.build();
    let evaluator = ExpressionEvaluator::new(&schema);

    let clauses = 100_000;
    let all = vec!["a==3"; clauses].join(" && ");
    let filter = parse(&all)?;
    evaluator.validate(&filter)?;
    assert!(evaluator.evaluate(&filter, &record)?);
    assert_eq!(filter.predicates().len(), clauses);

    let negated = parse(&format!("!({})", all))?;
    assert!(negated.is_negation_normal());
    assert!(!evaluator.evaluate(&negated, &record)?);

    let mut any = vec!["name==ann"; clauses - 1];
    any.push("name==bob");
    assert!(evaluator.evaluate(&parse(&any.join(" || "))?, &record)?);

    let nested = format!("{}a==3{}", "(".repeat(MAX_NESTING_DEPTH), ")".repeat(MAX_NESTING_DEPTH));
    assert!(evaluator.evaluate(&parse(&nested)?, &record)?);

    let too_deep = format!("{}a==3", "(".repeat(100_000));
    assert_eq!(
        parse(&too_deep),
        Err(ParseError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH
        })
    );
    Ok(())
}

#[test]
fn test_schema_snapshot_round_trips() -> Result<()> {
    let schema = create_schema();
    let decoded = SchemaSnapshot::deserialize(&schema.serialize()?)?;
    assert_eq!(decoded.record_size(), schema.record_size());
    assert_eq!(decoded.num_columns(), schema.num_columns());

    let mut rng = StdRng::seed_from_u64(11);
    let record = random_record(&mut rng, &schema)?;
    for column in 0..schema.num_columns() {
        assert_eq!(decoded.get_key(&record, column), schema.get_key(&record, column));
    }
    Ok(())
}
