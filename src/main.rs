use std::{env, fs::read_to_string, process};

use bminorc::errors::errors::CompileError;
use bminorc::lexer::lexer::tokenize;
use bminorc::{check_source, compile, parse_source, resolve_source};

fn usage(program: &str) -> ! {
    eprintln!("Usage:");
    eprintln!("\t{} -scan      filename.bminor", program);
    eprintln!("\t{} -parse     filename.bminor", program);
    eprintln!("\t{} -resolve   filename.bminor", program);
    eprintln!("\t{} -typecheck filename.bminor", program);
    eprintln!("\t{} -codegen   filename.bminor", program);
    process::exit(1);
}

fn report(error: &CompileError) {
    match error {
        CompileError::TypeCheck(diagnostics) => {
            for diagnostic in diagnostics {
                eprintln!("ERROR: {}", diagnostic);
            }
            eprintln!("{}", error);
        }
        other => eprintln!("ERROR: {}", other),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Error: not enough input arguments");
        usage(&args[0]);
    }

    let mode = args[1].as_str();
    let file = &args[2];
    let source = match read_to_string(file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: could not open file {}: {}", file, error);
            process::exit(1);
        }
    };
    let file_name = Some(file.clone());

    let outcome = match mode {
        "-scan" => tokenize(&source, file_name)
            .map(|tokens| {
                for token in &tokens {
                    println!("{}", token);
                }
            })
            .map_err(CompileError::from),
        "-parse" => parse_source(&source, file_name).map(|program| {
            for decl in &program {
                println!("{}\n", decl);
            }
        }),
        "-resolve" => resolve_source(&source, file_name).map(|_| ()),
        "-typecheck" => check_source(&source, file_name).map(|_| ()),
        "-codegen" => compile(&source, file_name).map(|assembly| print!("{}", assembly)),
        _ => {
            eprintln!("Error: unrecognized input arguments");
            usage(&args[0]);
        }
    };

    match outcome {
        Ok(()) => process::exit(0),
        Err(error) => {
            report(&error);
            process::exit(1);
        }
    }
}
