use ferrite_synth::synth::topology::MIN_LAYERS;
use ferrite_synth::{can_synthesize, synthesize, LookupRecord, Network, Topology, Vocabulary};

fn main() {
    let vocab = Vocabulary::reference();
    let topology = Topology::minimal(&vocab).with_extra_layers(2);
    println!(
        "{} hidden layers ({} padding), {} neurons each",
        topology.num_layers,
        topology.num_layers - MIN_LAYERS,
        topology.neurons_per_layer
    );

    let too_narrow = Topology::new(MIN_LAYERS, 4, vocab.output_size());
    println!("width 4 -> {}", can_synthesize(&too_narrow, &vocab).reason);

    let params = synthesize(&topology, &vocab).expect("reference topology is valid");
    let metadata = topology
        .network_spec(&vocab, "lookup")
        .metadata
        .unwrap_or_default();
    let network = Network::from_parameters(params).with_metadata(metadata.clone());

    for names in [
        ["A", "1", "B", "2", "A"],
        ["A", "1", "B", "2", "B"],
        ["C", "3", "A", "2", "A"],
        ["A", "1", "B", "2", "C"],
    ] {
        let record = LookupRecord::from_names(&vocab, names).expect("valid record");
        let probs = network.infer(record.encode(&vocab));
        let shown: Vec<String> = probs
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}={:.3}", metadata.output_label(i).unwrap_or("?"), p))
            .collect();
        println!("{} -> {}", record.describe(&vocab), shown.join(" "));
    }
}
