use mimalloc::MiMalloc;
use std::io;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() {
    cli::init_logging();
    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let status = cli::run(
        args,
        &mut cli::Stdio {
            stdin: &mut stdin,
            stdout: &mut stdout,
            stderr: &mut stderr,
        },
    );
    std::process::exit(status);
}
