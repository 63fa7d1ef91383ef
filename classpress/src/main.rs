use classpress_lib::press::class_press;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

const CLASSPRESS_INTRO: &str = r#"
        ________                     ____
       / ____/ /___ ___________     / __ \________  __________
      / /   / / __ `/ ___/ ___/    / /_/ / ___/ _ \/ ___/ ___/
     / /___/ / /_/ (__  |__  )    / ____/ /  /  __(__  |__  )
     \____/_/\__,_/____/____/    /_/   /_/   \___/____/____/

    Welcome to ClassPress - selector shortening for CSS and HTML!
"#;

#[derive(Parser)]
#[command(name = "classpress")]
#[command(about = "Shorten CSS class and id selectors across a stylesheet and its markup")]
struct Args {
    /// Input stylesheet.
    css: String,

    /// Markup documents rewritten against the same token map.
    html: Vec<String>,

    /// Directory the rewritten files and the token-map manifest land in.
    #[arg(short, long, default_value = "pressed")]
    out_dir: String,
}

fn main() {
    println!("{}", CLASSPRESS_INTRO);
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    let css_text = read_input(&args.css);
    let markup_docs: Vec<String> = args.html.iter().map(|path| read_input(path)).collect();

    let output = match class_press::press(&css_text, &markup_docs) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error pressing stylesheet: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::create_dir_all(&args.out_dir) {
        eprintln!("Error creating output directory {}: {}", args.out_dir, e);
        std::process::exit(1);
    }

    write_output(&output_path(&args.out_dir, &args.css), &output.css);
    for (path, markup) in args.html.iter().zip(&output.markup) {
        write_output(&output_path(&args.out_dir, path), markup);
    }

    let mut manifest = String::new();
    for (key, token) in output.tokens.iter() {
        manifest.push_str(key);
        manifest.push(' ');
        manifest.push_str(token);
        manifest.push('\n');
    }
    write_output(&Path::new(&args.out_dir).join("classpress.map"), &manifest);

    println!(
        "Pressed {} selector(s) across {} document(s).",
        output.tokens.len(),
        output.markup.len() + 1
    );
}

fn read_input(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn output_path(out_dir: &str, input: &str) -> PathBuf {
    match Path::new(input).file_name() {
        Some(name) => Path::new(out_dir).join(name),
        None => {
            eprintln!("Error resolving output name for {}", input);
            std::process::exit(1);
        }
    }
}

fn write_output(path: &Path, contents: &str) {
    match fs::write(path, contents) {
        Ok(()) => println!("Wrote {}", path.display()),
        Err(e) => {
            eprintln!("Error writing {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
