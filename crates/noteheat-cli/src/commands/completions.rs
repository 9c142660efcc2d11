use clap_complete::Shell;

pub fn run(shell: Shell, command: &mut clap::Command) {
    clap_complete::generate(shell, command, "noteheat", &mut std::io::stdout());
}
