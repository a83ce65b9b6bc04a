use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    multi::fold_many0,
    number::complete::double,
    sequence::{delimited, pair},
    IResult,
};

pub fn nom_parser(s: &str) -> f64 {
    expr(s).unwrap().1
}

fn factor(i: &str) -> IResult<&str, f64> {
    delimited(
        multispace0,
        alt((double, delimited(char('('), expr, char(')')))),
        multispace0,
    )(i)
}

fn term(i: &str) -> IResult<&str, f64> {
    let (i, init) = factor(i)?;
    fold_many0(
        pair(alt((char('*'), char('/'))), factor),
        move || init,
        |acc, (op, v)| if op == '*' { acc * v } else { acc / v },
    )(i)
}

fn expr(i: &str) -> IResult<&str, f64> {
    let (i, init) = term(i)?;
    fold_many0(
        pair(alt((char('+'), char('-'))), term),
        move || init,
        |acc, (op, v)| if op == '+' { acc + v } else { acc - v },
    )(i)
}
