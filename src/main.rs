use spdx_bom::adapters::outbound::analyzers::DebianLayerAnalyzer;
use spdx_bom::adapters::outbound::archive::TarArchiveExtractor;
use spdx_bom::adapters::outbound::console::StderrProgressReporter;
use spdx_bom::adapters::outbound::filesystem::FileSystemReader;
use spdx_bom::adapters::outbound::formatters::SpdxTagValueFormatter;
use spdx_bom::adapters::outbound::licensing::TextLicenseClassifier;
use spdx_bom::adapters::outbound::network::{
    CachingVcsResolver, GoVcsResolver, OciRegistryClient,
};
use spdx_bom::adapters::outbound::parsers::SpdxTagValueParser;
use spdx_bom::application::factories::{PresenterFactory, PresenterType};
use spdx_bom::application::use_cases::{
    GenerateDocumentUseCase, GoModuleScanner, OutlineDocumentUseCase,
};
use spdx_bom::cli::{Args, Command, DocumentCommand, OutlineArgs};
use spdx_bom::config;
use spdx_bom::ports::outbound::SbomFormatter;
use spdx_bom::shared::error::ExitCode;
use spdx_bom::shared::Result;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

async fn run() -> Result<()> {
    // Parse command-line arguments (clap exits with code 2 on usage errors)
    let args = Args::parse_args();

    if let Some(Command::Document {
        command: DocumentCommand::Outline(outline),
    }) = &args.command
    {
        return outline_document(outline);
    }

    // Merge the config file; command-line values win
    let mut options = args.to_options();
    let config_file = match &args.config {
        Some(path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(&std::env::current_dir()?)?,
    };
    if let Some(config_file) = config_file {
        config_file.apply_to(&mut options);
    }

    // Create adapters (Dependency Injection)
    let module_scanner = GoModuleScanner::new(
        FileSystemReader::new(),
        TextLicenseClassifier::new(),
        CachingVcsResolver::new(GoVcsResolver::new()?),
        StderrProgressReporter::new(),
    );
    let use_case = GenerateDocumentUseCase::new(
        TarArchiveExtractor::new(),
        OciRegistryClient::new()?,
        DebianLayerAnalyzer::new(),
        TextLicenseClassifier::new(),
        FileSystemReader::new(),
        module_scanner,
        StderrProgressReporter::new(),
    );

    // The use case writes output files itself; stdout is presented here
    let output_file = args.output.clone();
    options.output_file = output_file.clone();
    let doc = use_case.generate(options).await?;

    if output_file.is_none() {
        let rendered = SpdxTagValueFormatter::new().format(&doc)?;
        PresenterFactory::create(PresenterType::Stdout).present(&rendered)?;
    }

    Ok(())
}

fn outline_document(args: &OutlineArgs) -> Result<()> {
    let use_case = OutlineDocumentUseCase::new(SpdxTagValueParser::new());
    let outline = use_case.execute(&args.file, args.to_options())?;
    PresenterFactory::create(PresenterType::Stdout).present(&outline)
}
