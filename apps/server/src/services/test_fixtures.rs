// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Small STEP files shared by the service tests.

/// Wrap DATA section lines in a complete STEP file.
pub fn step_file(schema: &str, data: &str) -> String {
    format!(
        "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('fixture.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('{}'));
ENDSEC;
DATA;
{}
ENDSEC;
END-ISO-10303-21;
",
        schema, data
    )
}

/// A group, a wall with `Material = Concrete` and a door without properties.
pub const SCENARIO_A: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('scenario_a.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCGROUP('group-guid',$,'Group',$,$);
#2=IFCWALL('wall-guid',$,'Wall',$,$,$,$,$,$);
#3=IFCDOOR('door-guid',$,$,$,$,$,$,$,$,$,$,$,$);
#4=IFCPROPERTYSINGLEVALUE('Material',$,IFCLABEL('Concrete'),$);
#5=IFCPROPERTYSET('pset-guid',$,'Pset_Material',$,(#4));
#6=IFCRELDEFINESBYPROPERTIES('rel-guid',$,$,$,(#2),#5);
ENDSEC;
END-ISO-10303-21;
";

/// A column carrying `LoadBearing`, disjoint from [`SCENARIO_A`]'s properties.
pub const SCENARIO_B: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('scenario_b.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCCOLUMN('column-guid',$,'Column',$,$,$,$,$);
#2=IFCPROPERTYSINGLEVALUE('LoadBearing',$,IFCBOOLEAN(.T.),$);
#3=IFCPROPERTYSET('pset-guid',$,'Pset_ColumnCommon',$,(#2));
#4=IFCRELDEFINESBYPROPERTIES('rel-guid',$,$,$,(#1),#3);
ENDSEC;
END-ISO-10303-21;
";

/// Two walls with different ids, then a slab.
pub const TWO_WALLS: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('walls.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCWALL('wall-1',$,'First wall',$,$,$,$,$,$);
#2=IFCWALL('wall-2',$,'Second wall',$,$,$,$,$,$);
#3=IFCSLAB('slab-1',$,'Slab',$,$,$,$,$,$);
#4=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(0.25),$);
#5=IFCPROPERTYSINGLEVALUE('Layers',$,IFCINTEGER(3),$);
#6=IFCPROPERTYSET('pset-guid',$,'Pset_Dimensions',$,(#4,#5));
#7=IFCRELDEFINESBYPROPERTIES('rel-guid',$,$,$,(#1,#2),#6);
ENDSEC;
END-ISO-10303-21;
";

/// A wall voided by an opening, both assigned to a group.
pub const WALL_WITH_OPENING: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('opening.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCGROUP('group-guid',$,'Phase 1',$,$);
#2=IFCWALL('wall-guid',$,'Wall',$,$,$,$,$,$);
#3=IFCOPENINGELEMENT('opening-guid',$,'Opening',$,$,$,$,$,.OPENING.);
#4=IFCRELVOIDSELEMENT('voids-guid',$,$,$,#2,#3);
#5=IFCRELASSIGNSTOGROUP('assign-guid',$,$,$,(#2,#3),$,#1);
#6=IFCPROPERTYSINGLEVALUE('Depth',$,IFCLENGTHMEASURE(0.3),$);
#7=IFCPROPERTYSET('pset-guid',$,'Pset_Opening',$,(#6));
#8=IFCRELDEFINESBYPROPERTIES('rel-guid',$,$,$,(#3),#7);
ENDSEC;
END-ISO-10303-21;
";

/// Infrastructure objects next to a wall.
pub const INFRASTRUCTURE_4X3: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [ReferenceView]'),'2;1');
FILE_NAME('infra.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4X3_ADD2'));
ENDSEC;
DATA;
#1=IFCALIGNMENTSEGMENT('segment-guid',$,'Segment',$,$,$,$,$);
#2=IFCLIQUIDTERMINAL('terminal-guid',$,'Hydrant',$,$,$,$,$,$);
#3=IFCWALL('wall-guid',$,'Wall',$,$,$,$,$,$);
#4=IFCCARTESIANPOINT((0.,0.,0.));
ENDSEC;
END-ISO-10303-21;
";

/// IFC2X3-only object types.
pub const LEGACY_2X3: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('legacy.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCCHAMFEREDGEFEATURE('chamfer-guid',$,'Chamfer',$,$,$,$,$,$,$,$);
#2=IFCMOVE('move-guid',$,'Move',$,$,$,$,$,$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
";

/// A wall whose property set carries a lower-case `name` property.
pub const NAME_PROPERTY: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('names.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCWALL('wall-guid',$,'Wall',$,$,$,$,$,$);
#2=IFCPROPERTYSINGLEVALUE('name',$,IFCLABEL('Shadow name'),$);
#3=IFCPROPERTYSET('pset-guid',$,'Pset_Custom',$,(#2));
#4=IFCRELDEFINESBYPROPERTIES('rel-guid',$,$,$,(#1),#3);
ENDSEC;
END-ISO-10303-21;
";
