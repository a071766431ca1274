//! Command-line interface for xsdbind

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use xsdbind::dump::SchemaDump;
#[cfg(feature = "cli")]
use xsdbind::xsd::SchemaSet;
#[cfg(feature = "cli")]
use xsdbind::{Schema, Type, XsdLoader};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdbind")]
#[command(author, version, about = "Compile XML Schemas into repository types", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a schema and print its fields and types
    Compile {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Schema name (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Namespace prefix
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Rebuild a schema that is already registered
        #[arg(long = "override")]
        override_existing: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the named type definitions of a schema
    Types {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            schema,
            name,
            prefix,
            override_existing,
            json,
        } => cmd_compile(schema, name, prefix, override_existing, json),
        Commands::Types { schema } => cmd_types(schema),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_compile(
    schema_path: PathBuf,
    name: Option<String>,
    prefix: String,
    override_existing: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = match name {
        Some(name) => name,
        None => schema_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or("cannot derive a schema name from the path, use --name")?,
    };

    let set = SchemaSet::from_file(&schema_path)?;
    let loader = XsdLoader::new();
    let compilation = loader.compile_with_diagnostics(&name, &prefix, &set, override_existing)?;
    let schema = compilation
        .schema
        .ok_or("schema has no target namespace, nothing to compile")?;

    if json_output {
        println!("{}", SchemaDump::from_schema(&schema).to_json()?);
    } else {
        print_schema(&schema);
    }

    if !compilation.diagnostics.is_empty() {
        eprintln!();
        eprintln!("Skipped declarations:");
        for diagnostic in &compilation.diagnostics {
            eprintln!("  - {}", diagnostic);
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_schema(schema: &Schema) {
    println!("xsdbind v{}", xsdbind::VERSION);
    println!();
    println!("Schema: {}", schema.name());
    println!("  Namespace: {}", schema.namespace().uri);
    if schema.namespace().has_prefix() {
        println!("  Prefix: {}", schema.namespace().prefix);
    }

    println!("\n=== Fields ===");
    for field in schema.fields() {
        let flags = field.flags();
        if flags.is_empty() {
            println!("  {} : {}", field.name(), field.field_type().name());
        } else {
            println!("  {} : {} [{}]", field.name(), field.field_type().name(), flags);
        }
    }

    println!("\n=== Types ===");
    for type_ in schema.types() {
        match type_ {
            Type::Complex(complex) => {
                println!("  {} ({}, {} fields)", complex.name(), type_.kind(), complex.field_count());
            }
            Type::List(list) => {
                println!("  {} ({} of {})", list.name(), type_.kind(), list.item_type().name());
            }
            _ => println!("  {} ({})", type_.name(), type_.kind()),
        }
    }
}

#[cfg(feature = "cli")]
fn cmd_types(schema_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let set = SchemaSet::from_file(&schema_path)?;

    for schema in set.schemas().iter().filter(|s| !s.is_meta_schema()) {
        if schema.target_namespace.is_empty() {
            println!("(no namespace)");
        } else {
            println!("{}", schema.target_namespace);
        }
        for (name, id) in &schema.type_defs {
            let kind = if set.type_def(*id).is_complex() {
                "complex"
            } else {
                "simple"
            };
            println!("  {} ({})", name, kind);
        }
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
