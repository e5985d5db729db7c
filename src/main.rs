use rust_jmespath::errors::JMESPathError;
use rust_jmespath::Expression;

fn main() -> Result<(), JMESPathError> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let queries = if args.is_empty() {
        vec![String::from("foo[?bar == `\"baz\"`].{a: a, b: length(@)}")]
    } else {
        args
    };

    for query in queries {
        let e = Expression::standard(&query)?;
        println!("{}", query);
        println!("{:#?}", e);
    }

    Ok(())
}
