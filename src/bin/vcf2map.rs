use std::time::Instant;
use std::{env, process};

use gbwt::{FullPathName, GBZ};
use getopts::Options;
use simple_sds::serialize;

use vcf_map::{utils, MapBuilder, ReferencePath};

//-----------------------------------------------------------------------------

fn main() -> Result<(), String> {
    let start_time = Instant::now();

    // Parse arguments.
    let config = Config::new()?;

    // Check the output file before doing the expensive work.
    if utils::file_exists(&config.output_file) && !config.overwrite {
        return Err(format!("Output file {} already exists", config.output_file));
    }

    // Load the graph and index the reference path.
    eprintln!("Loading GBZ graph {}", config.gbz_file);
    let graph: GBZ = serialize::load_from(&config.gbz_file).map_err(|x| x.to_string())?;
    let path_name = config.path_name();
    let ref_path = ReferencePath::new(&graph, &path_name).map_err(|x| x.to_string())?;
    eprintln!("Reference path {} has {} nodes ({} bp)", path_name, ref_path.node_count(), ref_path.len());

    // Build the index and store it.
    let builder = MapBuilder::new(&graph, &ref_path, config.verbose);
    let map = builder.build_from_file(&config.vcf_file).map_err(|x| x.to_string())?;
    map.to_file(&config.output_file).map_err(|x| x.to_string())?;

    // Statistics.
    eprintln!(
        "The index covers {} nodes with {} variant edges over {} haplotypes",
        map.node_count(), map.variant_count(), map.n_haplotypes()
    );
    if let Some(size) = utils::file_size(&config.output_file) {
        eprintln!("Wrote {} ({})", config.output_file, size);
    }

    let end_time = Instant::now();
    let seconds = end_time.duration_since(start_time).as_secs_f64();
    eprintln!("Used {:.3} seconds", seconds);

    Ok(())
}

//-----------------------------------------------------------------------------

struct Config {
    pub gbz_file: String,
    pub vcf_file: String,
    pub output_file: String,
    pub sample: Option<String>,
    pub contig: String,
    pub overwrite: bool,
    pub verbose: bool,
}

impl Config {
    pub fn new() -> Result<Config, String> {
        let args: Vec<String> = env::args().collect();
        let program = args[0].clone();

        let mut opts = Options::new();
        opts.optflag("h", "help", "print this help");
        opts.optopt("v", "vcf", "phased VCF file, possibly gzip-compressed (required)", "FILE");
        opts.optopt("c", "contig", "contig name of the reference path (required)", "STR");
        opts.optopt("s", "sample", "sample name of the reference path (default: generic path)", "STR");
        opts.optopt("o", "output", "output file name (required)", "FILE");
        opts.optflag("", "overwrite", "overwrite the output file if it exists");
        opts.optflag("", "verbose", "print progress information");
        let matches = match opts.parse(&args[1..]) {
            Ok(m) => m,
            Err(f) => {
                eprintln!("{}", f);
                process::exit(1);
            }
        };

        if matches.opt_present("h") {
            let header = format!("Usage: {} [options] graph.gbz", program);
            eprint!("{}", opts.usage(&header));
            process::exit(0);
        }

        let gbz_file = if let Some(s) = matches.free.first() {
            s.clone()
        } else {
            let header = format!("Usage: {} [options] graph.gbz", program);
            eprint!("{}", opts.usage(&header));
            process::exit(1);
        };

        let vcf_file = matches.opt_str("v");
        let contig = matches.opt_str("c");
        let output_file = matches.opt_str("o");
        let sample = matches.opt_str("s");
        let overwrite = matches.opt_present("overwrite");
        let verbose = matches.opt_present("verbose");

        Ok(Config {
            gbz_file,
            vcf_file: vcf_file.ok_or("VCF file must be provided with --vcf".to_string())?,
            output_file: output_file.ok_or("Output file must be provided with --output".to_string())?,
            sample,
            contig: contig.ok_or("Contig name must be provided with --contig".to_string())?,
            overwrite,
            verbose,
        })
    }

    pub fn path_name(&self) -> FullPathName {
        match &self.sample {
            Some(sample) => FullPathName::reference(sample.as_str(), self.contig.as_str()),
            None => FullPathName::generic(self.contig.as_str()),
        }
    }
}

//-----------------------------------------------------------------------------
