//! Test fixtures for TG export parsing
//!
//! Provides realistic ExpDat and ExpRes contents shared by the parser tests
//! and the processor tests.

mod results_tests;

/// Complete ExpDat export with header, table and footer
pub fn sample_data_export() -> String {
    r#"#EXPORTTYPE:;DATA ALL
#FILE:;MFI20_RS03_L2.ngb-ss3
#FORMAT:;NETZSCH5
#FTYPE:;ANSI
#IDENTITY:;TG-01
#DATE/TIME:;15.03.2021 10:00:00
#SAMPLE:;MFI20 RS03
#SAMPLE MASS /mg:;50.00
#SAMPLE CRUCIBLE MASS /mg:;210.45 mg
#TEMPCAL:;TCAL_2020.tcx
#SENSITIVITY:;SENS_2020.exx
#SEG. 1:;30°C/10.0(K/min)/900°C
#SEG. 2:;900°C/30.0/900°C
#RANGE:;30°C/10.0(K/min)/900°C

##Temp./°C;Time/min;DSC/(mW/mg);Mass/%;Sensit./(uV/mW)
30.0;0.0;0.01;100.00;1.23
40.0;1.0;0.02;99.50;1.23
50.0;2.0;0.05;98.70;1.24
#END
"#
    .to_string()
}

/// Complete ExpRes export with seven result lines
pub fn sample_results_export() -> String {
    r#"#EXPORTTYPE:;RESULTS
#FILE:;MFI20_RS03_L2.ngb-ss3
#DATE/TIME:;15.03.2021 10:00:00

##Result;File;Segment;Unit;Range_Xmin;Range_Xmax;Range_Ymin;Range_Ymax;Result;Y_value
##Peak_1;1;1;°C;30,0;900,0;0,0;1,0;101,5;0,25
##Mass_Change_1;1;1;mg;30,0;200,0;-;-;-2,34;97,66
##Onset_1;1;1;°C;200,0;600,0;-;-;412,8;96,1
##Mass_Change_2;1;1;mg;200,0;600,0;-;-;-1,10;95,4
##Onset_2;1;1;°C;600,0;900,0;-;-;655,0;95,2
##Residual;1;1;mg;30,0;900,0;-;-;90,2;-4,90
##Peak_2;1;1;°C;30,0;900,0;-;-;660,3;n.a.
#END;
"#
    .to_string()
}

/// Build an ExpRes export from its result lines
pub fn results_export_with(lines: &[&str]) -> String {
    let mut content = String::from(
        "#EXPORTTYPE:;RESULTS\n\n##Result;File;Segment;Unit;Range_Xmin;Range_Xmax;Range_Ymin;Range_Ymax;Result;Y_value\n",
    );
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content.push_str("#END;\n");
    content
}

/// A well-formed result line with the given key
pub fn result_line(key: &str, result: &str) -> String {
    format!("##{};1;1;mg;30,0;900,0;-;-;{};1,0", key, result)
}
